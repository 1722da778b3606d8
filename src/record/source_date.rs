//! Month/year revision marker of the source page

use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// The source page's declared "last updated" month, normalized to `MM/YYYY`
///
/// Only month and year are kept; the day printed on the page is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceDate(NaiveDate);

impl SourceDate {
    /// Builds a date from a month (1-12) and year, `None` if out of range
    pub fn from_month_year(month: u32, year: i32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }
}

impl fmt::Display for SourceDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%m/%Y"))
    }
}

impl FromStr for SourceDate {
    type Err = chrono::ParseError;

    /// Parses a `MM/YYYY` token, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(&format!("01/{}", s.trim()), "%d/%m/%Y").map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_zero_padded() {
        let date = SourceDate::from_month_year(5, 2024).unwrap();
        assert_eq!(date.to_string(), "05/2024");
        assert_eq!(date.month(), 5);
        assert_eq!(date.year(), 2024);
    }

    #[test]
    fn test_from_month_year_rejects_bad_month() {
        assert!(SourceDate::from_month_year(0, 2024).is_none());
        assert!(SourceDate::from_month_year(13, 2024).is_none());
    }

    #[test]
    fn test_parse() {
        let date: SourceDate = " 11/2023\n".parse().unwrap();
        assert_eq!(date, SourceDate::from_month_year(11, 2023).unwrap());

        assert!("".parse::<SourceDate>().is_err());
        assert!("13/2023".parse::<SourceDate>().is_err());
        assert!("garbage".parse::<SourceDate>().is_err());
    }

    #[test]
    fn test_parse_display_agree() {
        let date = SourceDate::from_month_year(1, 2025).unwrap();
        assert_eq!(date.to_string().parse::<SourceDate>().unwrap(), date);
    }
}
