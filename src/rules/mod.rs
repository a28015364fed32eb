//! Invariants that span more than one write.

pub mod exclusivity;
pub mod ombudsman;

pub use exclusivity::{activate, apply_activation};
pub use ombudsman::respond;
