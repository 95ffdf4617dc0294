//! Sheet state and logic.
//!
//! - `state` - storage, lookups and bounding size
//! - `ops` - content edits, clearing, compaction
//! - `graph` - edge maintenance, cycle detection, invalidation, evaluation
//! - `io` - tab-separated export

mod cell;
mod graph;
mod io;
mod ops;
mod row;
mod state;

pub use cell::{Cell, CellView, Content, ESCAPE_SIGN, FORMULA_SIGN};
pub use state::{Sheet, Size};
