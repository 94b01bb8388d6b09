//! Relative time fields and absolute time reconstruction.
//!
//! Updates store time as an offset from the header's `timestamp_origin`,
//! split into a coarse day count, seconds, and optional milliseconds. The
//! absolute time is `origin + 86400 * days + seconds + millis / 1000`.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::{CodecError, Result};

pub const SECONDS_PER_DAY: u64 = 86_400;

/// Largest legal `elapsed_millisecs` value.
pub const MAX_MILLISECS: u32 = 999;

/// An offset from a header's timestamp origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Elapsed {
    pub days: Option<u32>,
    pub seconds: u32,
    pub millisecs: Option<u32>,
}

impl Elapsed {
    /// Whole seconds only, with no day or millisecond refinement.
    pub fn from_seconds(seconds: u32) -> Self {
        Self {
            days: None,
            seconds,
            millisecs: None,
        }
    }

    /// Split the offset of `timestamp` from `origin` (Unix seconds).
    ///
    /// Days are only present when non-zero and seconds hold the remainder
    /// within the day. Milliseconds are only present when the timestamp has
    /// a sub-second part, rounded down to whole milliseconds.
    pub fn between(origin: u32, timestamp: SystemTime) -> Result<Self> {
        let origin = UNIX_EPOCH + Duration::from_secs(u64::from(origin));
        let offset = timestamp
            .duration_since(origin)
            .map_err(|_| CodecError::TimestampBeforeOrigin)?;

        let total = offset.as_secs();
        let days =
            u32::try_from(total / SECONDS_PER_DAY).map_err(|_| CodecError::ElapsedOverflow)?;
        let seconds = (total % SECONDS_PER_DAY) as u32;
        let micros = offset.subsec_micros();

        Ok(Self {
            days: (days != 0).then_some(days),
            seconds,
            millisecs: (micros != 0).then_some(micros / 1000),
        })
    }

    /// Absolute time of this offset from `origin`.
    pub fn absolute_time(&self, origin: u32) -> ArchiveTime {
        let millis = u64::from(self.millisecs.unwrap_or(0));
        let seconds = u64::from(origin)
            + SECONDS_PER_DAY * u64::from(self.days.unwrap_or(0))
            + u64::from(self.seconds)
            + millis / 1000;
        ArchiveTime {
            seconds,
            millis: (millis % 1000) as u16,
        }
    }
}

/// An exact absolute UTC time with millisecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArchiveTime {
    /// Seconds since the Unix epoch.
    pub seconds: u64,
    /// Milliseconds within the second, `0..=999`.
    pub millis: u16,
}

impl ArchiveTime {
    pub fn as_secs_f64(&self) -> f64 {
        self.seconds as f64 + f64::from(self.millis) / 1000.0
    }

    pub fn to_system_time(&self) -> SystemTime {
        UNIX_EPOCH
            + Duration::from_secs(self.seconds)
            + Duration::from_millis(u64::from(self.millis))
    }
}
