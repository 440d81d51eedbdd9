mod filter;
mod summary;

pub use filter::{filter, FilterError, FilterField, Predicates};
pub use summary::{summarize, Summary};
