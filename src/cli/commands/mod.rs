pub mod auth;
pub mod data;
pub mod init;
pub mod record;
