pub mod auth;
pub mod certificate;
pub mod course;
pub mod payment;
pub mod progress;
pub mod serde_helper;
pub mod user;
