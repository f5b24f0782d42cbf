//! Serialization of carved volumes.

pub mod vox;

pub use vox::{save_model, write_model, VoxError};
