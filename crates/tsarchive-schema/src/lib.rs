//! Record and channel declarations for compact time-series archives.
//!
//! An archive starts with a single [`Header`] that declares every record it
//! will carry. Each [`Record`] is an ordered list of typed [`Channel`]s, and
//! updates later refer to a record by id and to its channels by position.
//!
//! A header is built once, then frozen. After freezing it is read-only and
//! can be shared freely across threads.

pub mod channel;
pub mod declaration;
pub mod error;
pub mod header;
pub mod record;

pub use channel::{Channel, ValueType};
pub use error::{Result, SchemaError};
pub use header::Header;
pub use record::Record;
