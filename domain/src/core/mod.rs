//! Core value objects and errors

pub mod error;
pub mod model;
pub mod problem;

pub use error::DomainError;
pub use model::Model;
pub use problem::Problem;
