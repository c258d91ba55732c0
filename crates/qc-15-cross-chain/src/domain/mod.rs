//! # Domain Layer
//!
//! Sequence ledger entities, parameter blobs and errors.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use value_objects::*;
