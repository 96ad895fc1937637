//! Shared pieces of the `harmonize` binary.

pub mod io;
pub mod logging;
