pub mod datatype;
pub mod defaults;
pub mod summary;

pub use datatype::*;
pub use defaults::{Defaults, DEFAULT_CURRENCY};
pub use summary::*;
