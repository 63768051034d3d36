// Utility functions
use chrono::{DateTime, SecondsFormat, Utc};

/// RFC 3339 with milliseconds and a `Z` suffix, as used in every API response.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn timestamp_now() -> String {
    format_timestamp(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamps_use_millis_and_zulu() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(format_timestamp(ts), "2026-03-04T05:06:07.000Z");
    }
}
