//! Pure derivations over a snapshot of the transaction list.
//!
//! Nothing here keeps state between calls or touches storage: callers pass
//! the records plus the view controls (range, heatmap mode, "today") and get
//! freshly built structures back.

mod categories;
mod filter;
mod heatmap;
mod records;
mod trend;

pub use categories::*;
pub use filter::*;
pub use heatmap::*;
pub use records::*;
pub use trend::*;
