//! hf-core: shared foundation for hoseflow.
//!
//! Contains:
//! - units (uom length type + constructors)
//! - numeric (Real + finiteness check)
//! - ids (stable compact handles for network elements)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{HfError, HfResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
