//! Profiles and roles.

mod profile;
mod role;

pub use profile::{Profile, MAX_FULL_NAME_CHARS};
pub use role::Role;
