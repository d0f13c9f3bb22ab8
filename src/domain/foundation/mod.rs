//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, error types and the state machine
//! trait that form the vocabulary of the academy domain.

mod auth;
mod authorization;
mod errors;
mod ids;
mod state_machine;
mod timestamp;
pub mod validate;

pub use auth::{AuthError, AuthenticatedUser};
pub use authorization::AuthorizationResult;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ClassTypeId, GymId, LocationId, PaymentId, PlanId, ProfileId, SubscriptionId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
