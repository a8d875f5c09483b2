pub mod denom;
pub mod error;
pub mod forwarder;
pub mod ica;
pub mod orchestrator;
pub mod split;
pub mod splitter;
pub mod topology;

pub use crate::error::{Error, Result};
