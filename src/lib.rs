#![warn(rust_2018_idioms, missing_debug_implementations)]
mod domain;
mod management;
mod store;

pub use crate::domain::*;
pub use crate::management::*;
pub use crate::store::*;
