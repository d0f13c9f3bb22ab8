//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `profile` - Profiles and roles
//! - `catalog` - Locations, gyms and class types
//! - `billing` - Plans, subscriptions, payments and Stripe webhooks
//! - `dashboard` - Read models for member and admin dashboards

pub mod billing;
pub mod catalog;
pub mod dashboard;
pub mod foundation;
pub mod profile;
