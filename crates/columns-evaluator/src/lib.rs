//! Strategy-facing side of Columns: the move catalog, the state codec and the
//! [`Strategy`](strategy::Strategy) capability.
//!
//! # Data Flow
//!
//! ```text
//! GameState ──encode_state──▶ [f32; 68] ──Strategy::activate──▶ Vec<f32>
//!                                                                 │
//!            Move ◀──MoveCatalog::get── position ◀──decode_output─┘
//! ```
//!
//! A strategy emits one weight per catalog position. The codec picks the
//! position with the highest softmax probability; the catalog maps it back to
//! a [`Move`](columns_engine::Move).
//!
//! # Modules
//!
//! - [`catalog`] - the fixed, ordered universe of move templates
//! - [`codec`] - state encoding and output decoding
//! - [`strategy`] - the [`Strategy`](strategy::Strategy) trait
//! - [`network`] - a dense feed-forward reference strategy

pub mod catalog;
pub mod codec;
pub mod network;
pub mod strategy;
