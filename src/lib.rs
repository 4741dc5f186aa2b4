// Library exports for testing
pub mod app;
pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod session;
