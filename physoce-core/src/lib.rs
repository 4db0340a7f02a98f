//! Numeric building blocks shared by the `physoce` crate.
//!
//! The helpers in [`num_rs`] mirror the numpy routines the oceanographic
//! algorithms are usually written against, so grid lengths and edge cases
//! line up with what users expect from numpy.

#![deny(missing_docs)]

mod error;
pub mod num_rs;

pub use error::{Error, Result};
