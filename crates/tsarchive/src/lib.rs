//! Compact archival encoding for multi-channel time-series measurements.
//!
//! An archive is a single header that declares records (labeled groups of
//! typed channels) followed by a stream of timestamped updates that carry one
//! value per channel. Time is stored as a day/second/millisecond offset from
//! the header's origin to keep each update small.
//!
//! # Crate Structure
//!
//! - [`schema`] — Header, record and channel declarations
//! - [`codec`] — Binary encoding of headers and updates
//! - [`producer`] — Named-channel monitors that emit updates (behind `producer` feature)
//! - [`logging`] — `tracing` subscriber setup for embedding binaries (behind `logging` feature)

/// Re-export schema types.
pub mod schema {
    pub use tsarchive_schema::*;
}

/// Re-export codec types.
pub mod codec {
    pub use tsarchive_codec::*;
}

/// Re-export producer types (requires `producer` feature).
#[cfg(feature = "producer")]
pub mod producer {
    pub use tsarchive_producer::*;
}

#[cfg(feature = "logging")]
pub mod logging;
