//! Budget model, built-in defaults and dashboard aggregation shared by the
//! budget server and the terminal client.

pub mod stat;

pub use stat::*;
