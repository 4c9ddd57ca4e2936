//! Game model and rules for Columns, a two-player stacking game on a 3×4 grid
//! of five-high columns.
//!
//! Players place roundels (scoring pieces) and blockers (sealing pieces of
//! arity 1 to 3). A column that fills with a roundel on top scores one point
//! for the roundel's owner.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
