//! Academy Hub - gym and academy management backend.
//!
//! Admins manage the catalog (locations, gyms, class types), membership
//! plans and member roles. Members sign in through the hosted auth service,
//! browse the catalog, and subscribe through Stripe; signed webhooks and a
//! cron-triggered retry pass keep subscription and payment rows current.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
