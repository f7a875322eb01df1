//! fxconv Common Types
//!
//! Currency codes shared by the rate table, the converter and the CLI.

pub mod error;
pub mod monetary;

pub use error::*;
pub use monetary::*;
