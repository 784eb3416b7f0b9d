//! Batch directory naming.

use chrono::{DateTime, Local, Utc};
use chrono_tz::Tz;
use serde::Deserialize;

/// Format for minute-granularity batch names.
pub const MINUTE_FORMAT: &str = "%Y-%m-%d-%H-%M";

/// How batch directories are named.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchNaming {
    /// `YYYY-MM-DD-HH-MM`; uploads within the same minute share a batch.
    #[default]
    Minute,
    /// Seconds since the Unix epoch.
    Unix,
}

#[derive(Debug, Clone, Copy)]
enum Zone {
    Local,
    Named(Tz),
}

/// Produces the batch directory name for an instant.
#[derive(Debug, Clone)]
pub struct BatchNamer {
    naming: BatchNaming,
    zone: Zone,
}

impl BatchNamer {
    /// Create a namer.
    ///
    /// `timezone` is either `"local"` or an IANA name such as `"Asia/Tokyo"`.
    /// Unknown names fall back to UTC.
    pub fn new(naming: BatchNaming, timezone: &str) -> Self {
        let zone = if timezone.eq_ignore_ascii_case("local") {
            Zone::Local
        } else {
            match timezone.parse::<Tz>() {
                Ok(tz) => Zone::Named(tz),
                Err(_) => {
                    tracing::warn!(timezone, "Unknown timezone, naming batches in UTC");
                    Zone::Named(Tz::UTC)
                }
            }
        };
        Self { naming, zone }
    }

    /// Batch directory name for `now`.
    pub fn name_for(&self, now: DateTime<Utc>) -> String {
        match self.naming {
            BatchNaming::Unix => now.timestamp().to_string(),
            BatchNaming::Minute => match self.zone {
                Zone::Local => now.with_timezone(&Local).format(MINUTE_FORMAT).to_string(),
                Zone::Named(tz) => now.with_timezone(&tz).format(MINUTE_FORMAT).to_string(),
            },
        }
    }
}

/// Source of the current time for upload handling.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stopped at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
