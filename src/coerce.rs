//! Best-effort coercion of raw cells into typed values.
//!
//! Each function answers "what usable value does this cell hold?" with an
//! `Option`. `None` means blank or unusable; the loader decides which default
//! replaces it. Nothing here can fail.

use crate::table::Cell;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Date-time layouts tried, in order, for text cells.
///
/// Month-first slashes come before day-first ones, so `03/04/2023` is read as
/// March 4th, while `25/12/2023` still parses (as December 25th).
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y", "%d.%m.%Y"];

/// Stringify a cell and trim it. Blank cells give `None`.
///
/// Whole numbers print without a fractional part, so an id typed as `42`
/// stays `"42"` rather than `"42.0"`.
pub fn text(cell: Option<&Cell>) -> Option<String> {
    let raw = match cell? {
        Cell::Empty => return None,
        Cell::Text(s) => s.trim().to_string(),
        Cell::Number(n) => format_number(*n),
        Cell::Bool(b) => b.to_string(),
        Cell::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
    };
    (!raw.is_empty()).then_some(raw)
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Read a cell as a non-negative count, truncating fractions.
///
/// Negative values clamp to zero. Text is accepted if it parses as a number
/// after trimming.
pub fn count(cell: Option<&Cell>) -> Option<u64> {
    let value = match cell? {
        Cell::Number(n) => *n,
        Cell::Text(s) => s.trim().parse::<f64>().ok()?,
        Cell::Empty | Cell::Bool(_) | Cell::DateTime(_) => return None,
    };
    if !value.is_finite() {
        return None;
    }
    Some(value.trunc().max(0.0) as u64)
}

/// Read a cell as a timestamp.
///
/// Date-formatted spreadsheet cells are taken as-is. Text is tried as RFC 3339
/// (converted to UTC), then against [`DATETIME_FORMATS`], then as a bare date
/// at midnight. Plain numbers are not treated as dates.
pub fn timestamp(cell: Option<&Cell>) -> Option<NaiveDateTime> {
    match cell? {
        Cell::DateTime(dt) => Some(*dt),
        Cell::Text(s) => parse_datetime_text(s.trim()),
        Cell::Empty | Cell::Number(_) | Cell::Bool(_) => None,
    }
}

fn parse_datetime_text(s: &str) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn ymd_hms(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    // =========================================================================
    // text
    // =========================================================================

    #[test]
    fn text_trims_and_drops_blanks() {
        assert_eq!(text(Some(&t("  hello "))), Some("hello".into()));
        assert_eq!(text(Some(&t("   "))), None);
        assert_eq!(text(Some(&Cell::Empty)), None);
        assert_eq!(text(None), None);
    }

    #[test]
    fn text_prints_whole_numbers_without_fraction() {
        assert_eq!(text(Some(&Cell::Number(42.0))), Some("42".into()));
        assert_eq!(text(Some(&Cell::Number(4.5))), Some("4.5".into()));
    }

    #[test]
    fn text_of_datetime_is_iso_like() {
        let cell = Cell::DateTime(ymd_hms("2023-01-02 03:04:05"));
        assert_eq!(text(Some(&cell)), Some("2023-01-02 03:04:05".into()));
    }

    // =========================================================================
    // count
    // =========================================================================

    #[test]
    fn count_accepts_numbers_and_numeric_text() {
        assert_eq!(count(Some(&Cell::Number(12.0))), Some(12));
        assert_eq!(count(Some(&t(" 7 "))), Some(7));
        assert_eq!(count(Some(&t("3.9"))), Some(3));
    }

    #[test]
    fn count_rejects_non_numeric() {
        assert_eq!(count(Some(&t("many"))), None);
        assert_eq!(count(Some(&t(""))), None);
        assert_eq!(count(Some(&t("1,234"))), None);
        assert_eq!(count(Some(&Cell::Bool(true))), None);
        assert_eq!(count(Some(&Cell::Empty)), None);
        assert_eq!(count(None), None);
    }

    #[test]
    fn count_rejects_non_finite() {
        assert_eq!(count(Some(&t("NaN"))), None);
        assert_eq!(count(Some(&t("inf"))), None);
        assert_eq!(count(Some(&Cell::Number(f64::INFINITY))), None);
    }

    #[test]
    fn count_clamps_negatives_to_zero() {
        assert_eq!(count(Some(&Cell::Number(-5.0))), Some(0));
        assert_eq!(count(Some(&t("-0.5"))), Some(0));
    }

    // =========================================================================
    // timestamp
    // =========================================================================

    #[test]
    fn timestamp_passes_through_datetime_cells() {
        let dt = ymd_hms("2023-06-01 12:00:00");
        assert_eq!(timestamp(Some(&Cell::DateTime(dt))), Some(dt));
    }

    #[test]
    fn timestamp_parses_iso_text() {
        assert_eq!(
            timestamp(Some(&t("2023-01-01 08:30:00"))),
            Some(ymd_hms("2023-01-01 08:30:00"))
        );
        assert_eq!(
            timestamp(Some(&t("2023-01-01T08:30"))),
            Some(ymd_hms("2023-01-01 08:30:00"))
        );
        assert_eq!(
            timestamp(Some(&t("2023-01-01"))),
            Some(ymd_hms("2023-01-01 00:00:00"))
        );
    }

    #[test]
    fn timestamp_converts_offsets_to_utc() {
        assert_eq!(
            timestamp(Some(&t("2023-01-01T10:00:00-03:00"))),
            Some(ymd_hms("2023-01-01 13:00:00"))
        );
    }

    #[test]
    fn timestamp_prefers_month_first_slashes() {
        assert_eq!(
            timestamp(Some(&t("03/04/2023"))),
            Some(ymd_hms("2023-03-04 00:00:00"))
        );
        assert_eq!(
            timestamp(Some(&t("25/12/2023 18:45"))),
            Some(ymd_hms("2023-12-25 18:45:00"))
        );
    }

    #[test]
    fn timestamp_garbage_is_none() {
        assert_eq!(timestamp(Some(&t("ontem à noite"))), None);
        assert_eq!(timestamp(Some(&t("2023-13-45"))), None);
        assert_eq!(timestamp(Some(&t(""))), None);
        assert_eq!(timestamp(Some(&Cell::Number(45000.0))), None);
        assert_eq!(timestamp(None), None);
    }
}
