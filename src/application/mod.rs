// Application layer: use cases over the stored transaction list.
// Each analysis view is derived fresh from a snapshot on every call.

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
