//! Core types and errors for dwarfstream

pub mod errors;
pub mod types;

pub use errors::*;
pub use types::*;
