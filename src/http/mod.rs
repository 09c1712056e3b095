pub mod auth_middleware;
pub mod client;
pub mod cookie_jar;
pub mod log_middleware;
