//! Period parsing.
//!
//! Source exports mix several period conventions, sometimes within one file.
//! Forms are attempted in a fixed order and the first success wins:
//!
//! 1. spreadsheet serial day, 1900 date system (day 0 = 1899-12-30)
//! 2. spreadsheet serial day, 1904 date system (only when 1 fails)
//! 3. strings: `YYYY-MM-DD`, `YYYY-MM`, `DD/MM/YYYY`, `Mon-YY` / `Mon YYYY`,
//!    and datetimes (time discarded)
//!
//! Numeric day/month strings are read day-first. A month-first reading is
//! only reached when the day-first one is impossible (e.g. `07/13/2023`).

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime};

use crate::io::Cell;

/// Serials below this fall on or before the phantom 1900-02-29 of the
/// 1900 date system and cannot be resolved reliably in it.
const SERIAL_1900_MIN: f64 = 61.0;

/// Full-date formats, day-first before month-first.
const DATE_FORMATS: [&str; 6] = [
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
];
const DATE_FORMATS_SHORT_YEAR: [&str; 3] = ["%d/%m/%y", "%d-%m-%y", "%m/%d/%y"];

const YEAR_MONTH_FORMATS: [&str; 2] = ["%Y-%m", "%Y/%m"];

/// `%B` accepts both full and abbreviated month names when parsing.
const MONTH_NAME_FORMATS: [&str; 6] = ["%B-%Y", "%B %Y", "%B/%Y", "%B-%y", "%B %y", "%B/%y"];

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Resolve a raw period cell to a calendar date.
pub fn parse_period(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Empty => None,
        Cell::Number(v) => from_serial(*v),
        Cell::Text(s) => parse_period_str(s),
    }
}

/// Resolve a raw period string. Purely numeric text is read as a serial day.
pub fn parse_period_str(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<f64>() {
        return from_serial(v);
    }

    parse_iso_date(s)
        .or_else(|| parse_year_month(s))
        .or_else(|| parse_full_date(s))
        .or_else(|| parse_month_name(s))
        .or_else(|| parse_datetime(s))
}

/// Serial day in the 1900 system, falling back to the 1904 system.
pub fn from_serial(v: f64) -> Option<NaiveDate> {
    from_serial_1900(v).or_else(|| from_serial_1904(v))
}

pub fn from_serial_1900(v: f64) -> Option<NaiveDate> {
    if !v.is_finite() || v < SERIAL_1900_MIN {
        return None;
    }
    add_days(NaiveDate::from_ymd_opt(1899, 12, 30)?, v)
}

pub fn from_serial_1904(v: f64) -> Option<NaiveDate> {
    if !v.is_finite() || v < 0.0 {
        return None;
    }
    add_days(NaiveDate::from_ymd_opt(1904, 1, 1)?, v)
}

fn add_days(epoch: NaiveDate, v: f64) -> Option<NaiveDate> {
    // The fractional part is a time of day.
    epoch.checked_add_days(Days::new(v.floor() as u64))
}

fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().filter(four_digit_year)
}

fn parse_year_month(s: &str) -> Option<NaiveDate> {
    YEAR_MONTH_FORMATS.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(&format!("{s} 01"), &format!("{fmt} %d"))
            .ok()
            .filter(four_digit_year)
    })
}

fn parse_full_date(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok().filter(four_digit_year))
        .or_else(|| {
            DATE_FORMATS_SHORT_YEAR
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        })
}

fn parse_month_name(s: &str) -> Option<NaiveDate> {
    let with_day = format!("01 {s}");
    MONTH_NAME_FORMATS.iter().find_map(|fmt| {
        let d = NaiveDate::parse_from_str(&with_day, &format!("%d {fmt}")).ok()?;
        // `%Y` happily reads "23" as year 23; leave that to the `%y` forms.
        if fmt.ends_with("%Y") && !four_digit_year(&d) {
            return None;
        }
        Some(d)
    })
}

fn parse_datetime(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
        .filter(four_digit_year)
}

fn four_digit_year(d: &NaiveDate) -> bool {
    d.year() >= 1000
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn serial_1900_epoch() {
        assert_eq!(parse_period(&Cell::Number(45108.0)), Some(d(2023, 7, 1)));
        assert_eq!(parse_period(&Cell::Number(45108.75)), Some(d(2023, 7, 1)));
        assert_eq!(parse_period(&text("45108")), Some(d(2023, 7, 1)));
        assert_eq!(from_serial_1900(61.0), Some(d(1900, 3, 1)));
    }

    #[test]
    fn serial_1904_only_when_1900_fails() {
        assert_eq!(from_serial_1900(10.0), None);
        assert_eq!(parse_period(&Cell::Number(10.0)), Some(d(1904, 1, 11)));
        assert_eq!(parse_period(&Cell::Number(-3.0)), None);
        assert_eq!(parse_period(&Cell::Number(f64::NAN)), None);
        assert_eq!(parse_period(&Cell::Number(1e300)), None);
    }

    #[test]
    fn year_month_and_day_first_agree() {
        let a = parse_period(&text("2023-07")).unwrap();
        let b = parse_period(&text("01/07/2023")).unwrap();
        assert_eq!(a, d(2023, 7, 1));
        assert_eq!(a, b);
        assert_eq!(crate::domain::FiscalYear::from_date(a).label(), "FY23/24");
    }

    #[test]
    fn string_forms() {
        assert_eq!(parse_period_str("2024-02-29"), Some(d(2024, 2, 29)));
        assert_eq!(parse_period_str("2024/03"), Some(d(2024, 3, 1)));
        assert_eq!(parse_period_str("5/1/2024"), Some(d(2024, 1, 5)));
        assert_eq!(parse_period_str("05-01-2024"), Some(d(2024, 1, 5)));
        assert_eq!(parse_period_str("05/01/24"), Some(d(2024, 1, 5)));
        assert_eq!(parse_period_str("Jul-23"), Some(d(2023, 7, 1)));
        assert_eq!(parse_period_str("Jul 2023"), Some(d(2023, 7, 1)));
        assert_eq!(parse_period_str("July 2023"), Some(d(2023, 7, 1)));
        assert_eq!(parse_period_str("September-24"), Some(d(2024, 9, 1)));
        assert_eq!(parse_period_str("Aug/2023"), Some(d(2023, 8, 1)));
        assert_eq!(parse_period_str("2023-07-15 13:45:00"), Some(d(2023, 7, 15)));
        assert_eq!(parse_period_str("2023-07-15T00:00:00.000"), Some(d(2023, 7, 15)));
        assert_eq!(parse_period_str("2023-07-15T08:00:00+10:00"), Some(d(2023, 7, 15)));
    }

    #[test]
    fn ambiguous_is_day_first_but_impossible_day_first_falls_back() {
        assert_eq!(parse_period_str("03/04/2023"), Some(d(2023, 4, 3)));
        assert_eq!(parse_period_str("04/13/2023"), Some(d(2023, 4, 13)));
    }

    #[test]
    fn unparseable_is_none() {
        assert_eq!(parse_period(&Cell::Empty), None);
        assert_eq!(parse_period_str("  "), None);
        assert_eq!(parse_period_str("not a date"), None);
        assert_eq!(parse_period_str("31/02/2023"), None);
        assert_eq!(parse_period_str("2023-13"), None);
    }
}
