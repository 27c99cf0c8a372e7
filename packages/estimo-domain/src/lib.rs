pub mod levels;
pub mod scope;
pub mod tree;

mod error;

pub use error::{Error, Result};
pub use scope::{CategoryScope, CategoryType, GLOBAL_SCOPE_KEY, Scope};
