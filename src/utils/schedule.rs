use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Parse a wall-clock "HH:MM" reservation time.
pub fn parse_time_hm(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok()
}

/// Normalize a reservation time to zero-padded "HH:MM" so stored strings
/// sort lexicographically in chronological order.
pub fn normalize_time_hm(raw: &str) -> Option<String> {
    parse_time_hm(raw).map(|t| t.format("%H:%M").to_string())
}

/// Combine a reservation date with its "HH:MM" time into the single
/// wall-clock instant used for expiry comparison.
pub fn scheduled_instant(date: NaiveDate, time: &str) -> Option<NaiveDateTime> {
    parse_time_hm(time).map(|t| date.and_time(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hour_minute() {
        assert_eq!(
            parse_time_hm("19:00"),
            Some(NaiveTime::from_hms_opt(19, 0, 0).unwrap())
        );
        assert_eq!(
            parse_time_hm(" 09:30 "),
            Some(NaiveTime::from_hms_opt(9, 30, 0).unwrap())
        );
    }

    #[test]
    fn rejects_malformed_times() {
        assert_eq!(parse_time_hm("7pm"), None);
        assert_eq!(parse_time_hm("25:00"), None);
        assert_eq!(parse_time_hm("19:61"), None);
        assert_eq!(parse_time_hm(""), None);
    }

    #[test]
    fn normalizes_to_zero_padded() {
        assert_eq!(normalize_time_hm("9:05"), Some("09:05".to_string()));
        assert_eq!(normalize_time_hm("19:00"), Some("19:00".to_string()));
    }

    #[test]
    fn combines_date_and_time() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let instant = scheduled_instant(date, "19:00").unwrap();

        assert_eq!(instant.date(), date);
        assert_eq!(instant.time(), NaiveTime::from_hms_opt(19, 0, 0).unwrap());

        let earlier = scheduled_instant(date, "10:00").unwrap();
        assert!(earlier < instant);
    }

    #[test]
    fn unparseable_time_yields_no_instant() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        assert_eq!(scheduled_instant(date, "later"), None);
    }
}
