//! Read-only views of the user, category and course collaborators.

pub mod model;

pub use model::{Category, Course, UserRef};
