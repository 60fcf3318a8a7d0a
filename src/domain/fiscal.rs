//! Financial-year classification (July to June).
//!
//! A date in July or later belongs to the FY starting that calendar year;
//! January to June belongs to the FY that started the previous year.
//! Labels use the last two digits of both boundary years: `FY23/24`.

use chrono::{Datelike, NaiveDate};

/// First month of the financial year.
pub const FY_START_MONTH: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FiscalYear {
    start_year: i32,
}

impl FiscalYear {
    pub fn from_start_year(start_year: i32) -> Self {
        Self { start_year }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        let start_year = if date.month() >= FY_START_MONTH {
            date.year()
        } else {
            date.year() - 1
        };
        Self { start_year }
    }

    pub fn start_year(self) -> i32 {
        self.start_year
    }

    pub fn label(self) -> String {
        format!(
            "FY{:02}/{:02}",
            self.start_year.rem_euclid(100),
            (self.start_year + 1).rem_euclid(100)
        )
    }

    /// Parse a user-supplied FY reference.
    ///
    /// Accepts a label (`FY23/24`, case-insensitive, optional `FY` prefix) or a
    /// four-digit start year (`2023`). Two-digit years are read as 20xx. The
    /// end year of a label must follow the start year.
    pub fn parse(raw: &str) -> Option<Self> {
        let s = raw.trim();
        if s.len() == 4 && s.chars().all(|c| c.is_ascii_digit()) {
            return s.parse().ok().map(Self::from_start_year);
        }

        let body = match s.get(..2) {
            Some(prefix) if prefix.eq_ignore_ascii_case("fy") => &s[2..],
            _ => s,
        };
        let (start, end) = body.split_once('/')?;
        if start.len() != 2 || end.len() != 2 {
            return None;
        }
        let start: i32 = start.parse().ok()?;
        let end: i32 = end.parse().ok()?;
        if (start + 1) % 100 != end {
            return None;
        }
        Some(Self::from_start_year(2000 + start))
    }
}

impl std::fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

/// `date → (fy_label, fy_start_year)`; a missing date yields `None`.
pub fn classify(date: Option<NaiveDate>) -> Option<(String, i32)> {
    let fy = FiscalYear::from_date(date?);
    Some((fy.label(), fy.start_year()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn july_starts_a_new_year() {
        assert_eq!(FiscalYear::from_date(d(2023, 7, 1)).label(), "FY23/24");
        assert_eq!(FiscalYear::from_date(d(2023, 6, 30)).label(), "FY22/23");
        assert_eq!(FiscalYear::from_date(d(2024, 1, 15)).start_year(), 2023);
    }

    #[test]
    fn century_rollover_label() {
        assert_eq!(FiscalYear::from_start_year(1999).label(), "FY99/00");
        assert_eq!(FiscalYear::from_start_year(2099).label(), "FY99/00");
    }

    #[test]
    fn classify_propagates_missing_date() {
        assert_eq!(classify(None), None);
        assert_eq!(classify(Some(d(2025, 3, 1))), Some(("FY24/25".to_string(), 2024)));
    }

    #[test]
    fn parse_accepts_labels_and_start_years() {
        assert_eq!(FiscalYear::parse("FY23/24"), Some(FiscalYear::from_start_year(2023)));
        assert_eq!(FiscalYear::parse("fy23/24"), Some(FiscalYear::from_start_year(2023)));
        assert_eq!(FiscalYear::parse("23/24"), Some(FiscalYear::from_start_year(2023)));
        assert_eq!(FiscalYear::parse(" 2023 "), Some(FiscalYear::from_start_year(2023)));
        assert_eq!(FiscalYear::parse("FY23/25"), None);
        assert_eq!(FiscalYear::parse("FY2023"), None);
        assert_eq!(FiscalYear::parse(""), None);
    }

    proptest! {
        #[test]
        fn label_agrees_with_start_year(days in 0i64..80_000) {
            let date = d(1900, 1, 1) + chrono::Duration::days(days);
            let (label, start) = classify(Some(date)).unwrap();
            let yy: i32 = label[2..4].parse().unwrap();
            prop_assert_eq!(yy, start.rem_euclid(100));
            prop_assert_eq!(FiscalYear::parse(&label).map(|fy| fy.start_year() % 100), Some(start % 100));
        }
    }
}
