#![deny(unsafe_code)]

pub mod materialize;

pub use materialize::{materialize_mapping, materialize_specs};
