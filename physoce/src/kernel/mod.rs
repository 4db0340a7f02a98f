//! Shared trait-first kernel substrate.
//!
//! Config validation happens once in [`KernelLifecycle::try_new`]; the run
//! methods of each capability trait then only check buffer shapes through
//! the [`Read1D`]/[`Write1D`] adapters.

mod errors;
mod io;
mod lifecycle;

pub use errors::*;
pub use io::*;
pub use lifecycle::*;
