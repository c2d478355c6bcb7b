//! Record model definitions
//!
//! Each model lives in its own module; this module re-exports the whole
//! surface so callers can `use rackbase_core::model::*`.

mod base;
mod component;
mod network;

// Re-exports
pub use base::*;
pub use component::*;
pub use network::*;
