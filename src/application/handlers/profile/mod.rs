//! Profile handlers.
//!
//! ## Commands
//! - Updating one's own details
//! - Changing a profile's role (admin)
//!
//! ## Queries
//! - Get own profile (created on first access)
//! - List profiles (admin)
//! - Admin authorization check

mod authorize_admin;
mod change_role;
mod get_profile;
mod list_profiles;
mod update_profile;

// Commands
pub use change_role::{ChangeRoleCommand, ChangeRoleHandler};
pub use update_profile::{UpdateProfileCommand, UpdateProfileHandler};

// Queries
pub use authorize_admin::AuthorizeAdminHandler;
pub use get_profile::{GetProfileHandler, GetProfileQuery};
pub use list_profiles::ListProfilesHandler;
