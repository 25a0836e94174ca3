use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Formats server unix timestamps in the display time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerClock {
    offset: FixedOffset,
}

impl Default for ServerClock {
    fn default() -> Self {
        Self::with_offset_hours(0)
    }
}

impl ServerClock {
    /// Offsets outside ±23h fall back to UTC.
    pub fn with_offset_hours(hours: i32) -> Self {
        let offset = hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix());
        Self { offset }
    }

    pub fn local(&self, timestamp: i64) -> Option<DateTime<FixedOffset>> {
        DateTime::<Utc>::from_timestamp(timestamp, 0).map(|utc| utc.with_timezone(&self.offset))
    }

    /// `HH:MM:SS`, used to stamp feed lines.
    pub fn time_label(&self, timestamp: i64) -> String {
        self.local(timestamp)
            .map(|time| time.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "--:--:--".to_string())
    }

    /// `HH:MM, DD/MM/YYYY`, used for the last update header.
    pub fn updated_at_label(&self, timestamp: i64) -> String {
        self.local(timestamp)
            .map(|time| time.format("%H:%M, %d/%m/%Y").to_string())
            .unwrap_or_else(|| "--:--, --/--/----".to_string())
    }
}
