//! Canonical types
//!
//! Provider-agnostic prompt, tool, option and result types. Every adapter in
//! `providers` translates between these and its own wire format.

pub mod common;
pub mod image;
pub mod message;
pub mod options;
pub mod response;
pub mod tools;

pub use common::*;
pub use image::*;
pub use message::*;
pub use options::*;
pub use response::*;
pub use tools::*;
