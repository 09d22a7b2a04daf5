// handlers/public/auth/mod.rs - Credential check

pub mod login;

pub use login::{login_post, LoginRequest};
