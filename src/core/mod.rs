pub mod academy;
pub mod avatar;
pub mod catalog;
pub mod checkout;
pub mod password_reset;
pub mod player;
pub mod profile;
