pub mod error;
pub mod math;
pub mod archive;

pub mod node;
pub mod surface;
pub mod skeleton;
pub mod shape;
pub mod container;

pub mod wheel;
pub mod diag;
pub mod document;
pub mod export;
pub mod import;
pub mod convert;

#[cfg(test)]
mod test_util;

pub use crate::error::{Error, Result};
