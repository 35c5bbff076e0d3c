#[macro_use]
extern crate lazy_static;

pub mod aliases;
pub mod aliasing;
pub mod catalog;
pub mod constants;
pub mod error;
pub mod harmonics;
pub mod orbital;
pub mod report;
pub mod utils;

pub use error::{FrequencyError, Result};
