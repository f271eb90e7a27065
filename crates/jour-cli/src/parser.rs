use anyhow::Result;
use chrono::{NaiveDate, NaiveTime, Utc};
use chrono_english::{parse_date_string, Dialect};

/// Parses a calendar date from ISO form or natural language
/// ('tomorrow', 'next friday').
pub fn parse_natural_date(date_str: &str) -> Result<NaiveDate> {
    let trimmed = date_str.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    parse_date_string(trimmed, Utc::now(), Dialect::Us)
        .map(|dt| dt.date_naive())
        .map_err(|e| anyhow::anyhow!("Failed to parse date '{}': {}", date_str, e))
}

/// Parse time string like "9:00 AM", "14:30", "9pm", "noon", "midnight"
pub fn parse_time_of_day(time_str: &str) -> Result<NaiveTime> {
    let input = time_str.trim().to_lowercase();

    match input.as_str() {
        "noon" => return Ok(NaiveTime::from_hms_opt(12, 0, 0).unwrap()),
        "midnight" => return Ok(NaiveTime::from_hms_opt(0, 0, 0).unwrap()),
        _ => {}
    }

    let formats = [
        "%H:%M:%S", // 14:30:00
        "%H:%M",    // 14:30
        "%I:%M %p", // 9:00 am
        "%I%p",     // 9am
        "%I %p",    // 9 am
    ];

    for format in &formats {
        if let Ok(time) = NaiveTime::parse_from_str(&input, format) {
            return Ok(time);
        }
    }

    Err(anyhow::anyhow!(
        "Invalid time format: '{}'. Use 24-hour ('14:30'), 12-hour ('2:30 pm', '9am'), 'noon' or 'midnight'",
        time_str
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn iso_dates_parse_directly() {
        assert_eq!(
            parse_natural_date("2025-09-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()
        );
    }

    #[test]
    fn natural_language_dates_resolve() {
        let today = Utc::now().date_naive();
        assert_eq!(parse_natural_date("today").unwrap(), today);
        assert_eq!(
            parse_natural_date("tomorrow").unwrap(),
            today.succ_opt().unwrap()
        );
    }

    #[test]
    fn garbage_dates_are_rejected() {
        assert!(parse_natural_date("not-a-date-at-all").is_err());
    }

    #[test]
    fn common_time_forms_parse() {
        assert_eq!(
            parse_time_of_day("14:30").unwrap(),
            NaiveTime::from_hms_opt(14, 30, 0).unwrap()
        );
        assert_eq!(
            parse_time_of_day("9:00 AM").unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap()
        );
        assert_eq!(
            parse_time_of_day("9pm").unwrap(),
            NaiveTime::from_hms_opt(21, 0, 0).unwrap()
        );
        assert_eq!(
            parse_time_of_day("noon").unwrap(),
            NaiveTime::from_hms_opt(12, 0, 0).unwrap()
        );
    }

    #[test]
    fn nonsense_times_are_rejected() {
        assert!(parse_time_of_day("25:99").is_err());
        assert!(parse_time_of_day("sometime").is_err());
    }

    #[test]
    fn weekday_resolves_to_upcoming_date() {
        let date = parse_natural_date("next friday").unwrap();
        assert_eq!(date.weekday(), chrono::Weekday::Fri);
    }
}
