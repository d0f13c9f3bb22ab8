//! Authentication flow handlers.
//!
//! Thin pass-through to the hosted auth service. Passwords are only
//! length-checked here; hashing, reset tokens and sessions stay with the
//! service.

mod password;
mod sign_in;
mod sign_up;

pub use password::{RequestPasswordResetHandler, UpdatePasswordCommand, UpdatePasswordHandler};
pub use sign_in::{SignInCommand, SignInHandler};
pub use sign_up::{SignUpCommand, SignUpHandler, MIN_PASSWORD_CHARS};
