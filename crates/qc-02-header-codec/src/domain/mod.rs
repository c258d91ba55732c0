//! Domain layer for the header codec.

pub mod consensus;
pub mod errors;
pub mod header;

pub use consensus::*;
pub use errors::*;
pub use header::*;
