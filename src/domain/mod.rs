mod category;
mod date;
mod money;
mod range;
mod transaction;

pub use category::*;
pub use date::*;
pub use money::*;
pub use range::*;
pub use transaction::*;
