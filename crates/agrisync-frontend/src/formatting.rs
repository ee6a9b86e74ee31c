use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};

/// Formats a confidence in `[0, 1]` as a whole percentage.
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.0}%", (confidence.clamp(0.0, 1.0) * 100.0).round())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Short weekday label used by the forecast strip.
pub fn format_weekday(date: NaiveDate) -> String {
    date.format("%a %-d").to_string()
}

pub fn format_time(time: NaiveDateTime) -> String {
    time.format("%H:%M").to_string()
}

/// Formats a notification timestamp in the user's local time zone.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%b %-d, %H:%M")
        .to_string()
}

/// Formats the length of a shift as `Hh MMm`.
pub fn format_shift(check_in: NaiveDateTime, check_out: NaiveDateTime) -> String {
    let minutes = (check_out - check_in).num_minutes().max(0);
    format!("{}h {:02}m", minutes / 60, minutes % 60)
}

/// Share of `value` in `max`, clamped to `[0, 1]`. Used for bar widths.
pub fn ratio(value: f64, max: f64) -> f32 {
    if max <= 0.0 {
        return 0.0;
    }
    (value / max).clamp(0.0, 1.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 15)
            .and_then(|day| day.and_hms_opt(hour, minute, 0))
            .unwrap()
    }

    #[test]
    fn confidence_is_a_rounded_percentage() {
        assert_eq!(format_confidence(0.87), "87%");
        assert_eq!(format_confidence(0.005), "1%");
        assert_eq!(format_confidence(1.0), "100%");
    }

    #[test]
    fn dates_and_shifts() {
        assert_eq!(format_date(at(8, 2).date()), "Jun 15, 2024");
        assert_eq!(format_time(at(8, 2)), "08:02");
        assert_eq!(format_shift(at(8, 2), at(17, 5)), "9h 03m");
        assert_eq!(format_shift(at(17, 5), at(8, 2)), "0h 00m");
    }

    #[test]
    fn ratio_handles_empty_series() {
        assert_eq!(ratio(5.0, 0.0), 0.0);
        assert_eq!(ratio(2500.0, 5000.0), 0.5);
        assert_eq!(ratio(7.0, 5.0), 1.0);
    }
}
