//! Data models
//!
//! Shared between the label engine and the embedding application.
//! Templates and paper sizes round-trip through JSON; all geometry is
//! label-local `f32` pixels with a top-left origin.

pub mod label_template;
pub mod paper_size;
pub mod product;

// Re-exports
pub use label_template::*;
pub use paper_size::*;
pub use product::*;
