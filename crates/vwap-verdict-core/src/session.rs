use chrono::{DateTime, NaiveDate, Timelike, Utc};
use chrono_tz::America::New_York;
use serde::{Deserialize, Serialize};

/// Trading session classification, US Eastern time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    /// Pre-market: 4:00 - 9:30 ET
    PreMarket,
    /// Regular market hours: 9:30 - 16:00 ET
    Regular,
    /// After-hours: 16:00 - 20:00 ET
    AfterHours,
    /// Outside all trading sessions.
    Closed,
}

impl SessionKind {
    /// Classify a UTC timestamp into the session it falls in.
    pub fn at(timestamp: &DateTime<Utc>) -> Self {
        let et = timestamp.with_timezone(&New_York);
        let total_minutes = et.hour() * 60 + et.minute();

        // Pre-market: 4:00 (240) to 9:29 (569)
        // Regular: 9:30 (570) to 15:59 (959)
        // After-hours: 16:00 (960) to 19:59 (1199)
        match total_minutes {
            240..570 => SessionKind::PreMarket,
            570..960 => SessionKind::Regular,
            960..1200 => SessionKind::AfterHours,
            _ => SessionKind::Closed,
        }
    }

    /// Caption label, e.g. "after-hours".
    pub fn label(self) -> &'static str {
        match self {
            SessionKind::PreMarket => "pre-market",
            SessionKind::Regular => "regular session",
            SessionKind::AfterHours => "after-hours",
            SessionKind::Closed => "closed",
        }
    }
}

/// The US/Eastern calendar date a timestamp belongs to.
///
/// After-hours bars cross the UTC date boundary (19:59 ET is 00:59 UTC the
/// next day), so grouping bars into sessions must use the exchange-local
/// date, never the UTC one.
pub fn session_date(timestamp: &DateTime<Utc>) -> NaiveDate {
    timestamp.with_timezone(&New_York).date_naive()
}

/// "HH:MM:SS ET" rendering of a timestamp, for the dashboard caption.
pub fn display_time(timestamp: &DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&New_York)
        .format("%H:%M:%S ET")
        .to_string()
}

/// "HH:MM" ET rendering, for chart axis labels.
pub fn display_clock(timestamp: &DateTime<Utc>) -> String {
    timestamp.with_timezone(&New_York).format("%H:%M").to_string()
}
