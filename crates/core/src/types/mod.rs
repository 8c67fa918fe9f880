//! Shared type definitions.

mod id;

pub use id::*;
