//! Compact binary encoding of archive headers and timestamped updates.
//!
//! An archive is one header followed by a stream of updates. The header is
//! written once with [`encode_header`]. Each update then refers to a record by
//! id, carries its time as an offset from the header's origin, and lists one
//! value per channel in declaration order:
//!
//! - Record ids, counts and time offsets are LEB128 varints
//! - Day and millisecond offsets are optional, flagged in a presence byte
//! - Values are a one-byte type tag plus a single payload
//!
//! Encoding and decoding are pure functions over a frozen [`Header`], so one
//! header can serve any number of threads. Framing of consecutive updates is
//! left to the caller: [`decode_update`] expects exactly one update.
//!
//! [`Header`]: tsarchive_schema::Header

pub mod config;
pub mod error;
pub mod header;
pub mod time;
pub mod update;
pub mod value;
pub mod varint;

pub use config::CodecConfig;
pub use error::{CodecError, Result};
pub use header::{decode_header, decode_header_with_config, encode_header, MAGIC, VERSION};
pub use time::{ArchiveTime, Elapsed, MAX_MILLISECS, SECONDS_PER_DAY};
pub use update::{decode_update, encode_update, encode_update_into, DecodedUpdate, Update};
pub use value::Value;
