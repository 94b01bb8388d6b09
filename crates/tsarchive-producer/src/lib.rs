//! Producer-side record monitors that emit encoded archive updates.
//!
//! A producer declares one monitor per record, starts a session (which fixes
//! the header and its timestamp origin), then reports samples by channel name.
//! Each report becomes one encoded update ready for whatever transport or
//! file writer the embedding system uses.

pub mod error;
pub mod producer;
pub mod sample;

pub use error::{ProducerError, Result};
pub use producer::ArchiveProducer;
pub use sample::Sample;
