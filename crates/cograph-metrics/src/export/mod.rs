//! Exports for external renderers.

pub mod dot;

pub use dot::to_dot;
