#![doc = include_str!("../README.md")]

mod allocator;
mod error;
mod generator;
mod random;
mod space;
mod store;
mod words;

pub use crate::allocator::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::random::*;
pub use crate::space::*;
pub use crate::store::*;
pub use crate::words::*;
