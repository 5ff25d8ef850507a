//! Provider implementations

pub mod hyperbolic;
