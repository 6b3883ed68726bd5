use chrono::{Datelike, NaiveDate};

/// Human-readable span such as `"Mar 2019 – present"` or
/// `"Sep 2014 – Jun 2018"`. A span inside a single month collapses to that
/// month.
pub fn format_period(start: NaiveDate, end: Option<NaiveDate>, present_label: &str) -> String {
    let from = start.format("%b %Y").to_string();
    match end {
        None => format!("{from} – {present_label}"),
        Some(end) if end.year() == start.year() && end.month() == start.month() => from,
        Some(end) => format!("{from} – {}", end.format("%b %Y")),
    }
}

/// Elapsed days as rounded years and months, e.g. `"2 yr 3 mo"`.
pub fn format_duration(days: i64) -> String {
    let months = (days.max(0) as f64 / 30.44).round() as i64;
    match (months / 12, months % 12) {
        (0, 0) => "< 1 mo".to_string(),
        (0, m) => format!("{m} mo"),
        (y, 0) => format!("{y} yr"),
        (y, m) => format!("{y} yr {m} mo"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    }

    #[test]
    fn ongoing_uses_present_label() {
        assert_eq!(format_period(ymd(2019, 3, 1), None, "present"), "Mar 2019 – present");
        assert_eq!(format_period(ymd(2019, 3, 1), None, "oggi"), "Mar 2019 – oggi");
    }

    #[test]
    fn closed_spans() {
        assert_eq!(
            format_period(ymd(2014, 9, 1), Some(ymd(2018, 6, 30)), "present"),
            "Sep 2014 – Jun 2018"
        );
        assert_eq!(
            format_period(ymd(2016, 4, 2), Some(ymd(2016, 4, 4)), "present"),
            "Apr 2016"
        );
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(-5), "< 1 mo");
        assert_eq!(format_duration(62), "2 mo");
        assert_eq!(format_duration(365), "1 yr");
        assert_eq!(format_duration(365 + 92), "1 yr 3 mo");
    }
}
