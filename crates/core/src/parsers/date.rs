use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized date {0:?} (expected YYYY-MM-DD, YYYY-MM or YYYY)")]
pub struct DateError(pub String);

/// Words that mark an entry as still running.
const ONGOING: &[&str] = &["present", "now", "current", "ongoing"];

/// Parse a start date. Partial dates pin to the first day of the period,
/// so `"2019"` is 2019-01-01 and `"2019-03"` is 2019-03-01.
pub fn parse_date(raw: &str) -> Result<NaiveDate, DateError> {
    let s = raw.trim();
    // Full ISO timestamps: keep the date part.
    let s = s.split_once('T').map_or(s, |(d, _)| d);
    let err = || DateError(raw.to_string());

    let mut parts = s.split(['-', '/']);
    let year: i32 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(err)?;
    let month: u32 = match parts.next() {
        Some(p) => p.parse().map_err(|_| err())?,
        None => 1,
    };
    let day: u32 = match parts.next() {
        Some(p) => p.parse().map_err(|_| err())?,
        None => 1,
    };
    if parts.next().is_some() {
        return Err(err());
    }
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(err)
}

/// Parse an optional end date; missing, blank and "present"-like values
/// mean the entry is ongoing.
pub fn parse_end_date(raw: Option<&str>) -> Result<Option<NaiveDate>, DateError> {
    let Some(s) = raw.map(str::trim) else {
        return Ok(None);
    };
    if s.is_empty() || ONGOING.iter().any(|w| s.eq_ignore_ascii_case(w)) {
        return Ok(None);
    }
    parse_date(s).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    }

    #[test]
    fn full_and_partial_dates() {
        assert_eq!(parse_date("2019-03-15"), Ok(ymd(2019, 3, 15)));
        assert_eq!(parse_date("2019-03"), Ok(ymd(2019, 3, 1)));
        assert_eq!(parse_date("2019"), Ok(ymd(2019, 1, 1)));
        assert_eq!(parse_date(" 2019/07 "), Ok(ymd(2019, 7, 1)));
        assert_eq!(parse_date("2019-03-15T10:00:00Z"), Ok(ymd(2019, 3, 15)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_date("soon").is_err());
        assert!(parse_date("2019-13").is_err());
        assert!(parse_date("2019-02-30").is_err());
        assert!(parse_date("2019-01-01-01").is_err());
    }

    #[test]
    fn ongoing_end_dates() {
        assert_eq!(parse_end_date(None), Ok(None));
        assert_eq!(parse_end_date(Some("")), Ok(None));
        assert_eq!(parse_end_date(Some("Present")), Ok(None));
        assert_eq!(parse_end_date(Some("2020-02")), Ok(Some(ymd(2020, 2, 1))));
    }
}
