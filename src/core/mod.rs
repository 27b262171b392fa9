//! Core data model, archive-name decoding, sequence reconciliation and
//! invalidation linking.
//!
//! Everything here works on in-memory values for one run; reading bundles,
//! parsing documents and writing reports live behind the other features.

mod config;
mod error;
mod filename;
mod invalidation;
mod sequence;
mod types;

pub use config::*;
pub use error::*;
pub use filename::*;
pub use invalidation::*;
pub use sequence::*;
pub use types::*;
