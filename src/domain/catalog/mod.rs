//! Academy catalog: locations, the gyms inside them, and class types.

mod class_type;
mod gym;
mod location;

pub use class_type::{ClassType, ClassTypeInput, MAX_CLASS_DURATION_MINUTES};
pub use gym::{Gym, GymInput, MAX_GYM_CAPACITY};
pub use location::{Location, LocationInput};
