//! Acquisition timestamps: parsing the feed's `HHMM` times and formatting
//! them for the dashboard's display zone.

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, Offset, Timelike, Utc};

const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Parses an acquisition time such as `"834"`, `"0834"` or `"08:34"`.
///
/// Non-digits are dropped and the remainder is left-padded to four digits;
/// only the last four digits are used, as the upstream feed does.
pub fn parse_acq_time(date: NaiveDate, time: &str) -> Option<NaiveDateTime> {
    let digits: String = time.chars().filter(char::is_ascii_digit).collect();
    let padded = format!("{digits:0>4}");
    let tail = &padded[padded.len() - 4..];
    let hour = tail[..2].parse::<u32>().ok()?;
    let minute = tail[2..].parse::<u32>().ok()?;
    date.and_hms_opt(hour, minute, 0)
}

/// Display zone for formatted detection times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalClock {
    offset: FixedOffset,
    label: String,
}

impl LocalClock {
    pub fn new(offset: FixedOffset, label: impl Into<String>) -> Self {
        Self {
            offset,
            label: label.into(),
        }
    }

    pub fn ist() -> Self {
        let offset = FixedOffset::east_opt(IST_OFFSET_SECS).unwrap_or_else(|| Utc.fix());
        Self::new(offset, "IST")
    }

    /// Formats a UTC instant as `h:mm AM/PM <label>`.
    pub fn format(&self, utc: NaiveDateTime) -> String {
        let local = utc + self.offset;
        let hour = local.hour();
        let hour12 = match hour % 12 {
            0 => 12,
            h => h,
        };
        let meridiem = if hour < 12 { "AM" } else { "PM" };
        format!(
            "{hour12}:{minute:02} {meridiem} {label}",
            minute = local.minute(),
            label = self.label
        )
    }
}

impl Default for LocalClock {
    fn default() -> Self {
        Self::ist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 12).unwrap_or_default()
    }

    #[test]
    fn short_times_are_zero_padded() {
        let parsed = parse_acq_time(date(), "834");
        assert_eq!(parsed, date().and_hms_opt(8, 34, 0));
    }

    #[test]
    fn separators_are_ignored() {
        assert_eq!(parse_acq_time(date(), "20:05"), date().and_hms_opt(20, 5, 0));
    }

    #[test]
    fn empty_time_means_midnight() {
        assert_eq!(parse_acq_time(date(), ""), date().and_hms_opt(0, 0, 0));
    }

    #[test]
    fn out_of_range_hour_is_rejected() {
        assert_eq!(parse_acq_time(date(), "2575"), None);
    }

    #[test]
    fn ist_formatting_crosses_noon() {
        let clock = LocalClock::ist();
        let utc = date().and_hms_opt(8, 34, 0).unwrap_or_default();
        assert_eq!(clock.format(utc), "2:04 PM IST");

        let late = date().and_hms_opt(18, 45, 0).unwrap_or_default();
        assert_eq!(clock.format(late), "12:15 AM IST");
    }
}
