pub mod session_auth;

pub use session_auth::{
    check_session_timeout, cleared_session_cookie, extract_session_key, session_auth,
    session_cookie,
};
