//! Query descriptors and the traversal plans that generate them.

use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::error::{AppError, Result};

/// One unit of pagination. Each descriptor maps to exactly one query URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryDescriptor {
    /// 1-based result page number
    PageIndex(u32),
    /// Archive day
    CalendarDate(NaiveDate),
}

impl fmt::Display for QueryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PageIndex(n) => write!(f, "page {n}"),
            Self::CalendarDate(date) => write!(
                f,
                "archive date {}/{}/{}",
                date.month(),
                date.day(),
                date.year()
            ),
        }
    }
}

/// Inclusive calendar interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Parse a `"mm/dd/yyyy mm/dd/yyyy"` string.
    pub fn parse(input: &str) -> Result<Self> {
        let parts: Vec<&str> = input.split_whitespace().collect();
        if parts.len() != 2 {
            return Err(AppError::config(format!(
                "Date range '{input}' must be two dates of the form 'mm/dd/yyyy mm/dd/yyyy'"
            )));
        }

        let parse_one = |s: &str| {
            NaiveDate::parse_from_str(s, "%m/%d/%Y")
                .map_err(|e| AppError::config(format!("Invalid date '{s}': {e}")))
        };

        Ok(Self::new(parse_one(parts[0])?, parse_one(parts[1])?))
    }

    /// Every day in the interval, ascending. Empty when `end < start`.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + Send + 'static {
        let end = self.end;
        std::iter::successors(Some(self.start), |d| d.succ_opt()).take_while(move |d| *d <= end)
    }

    /// `mmddyy-mmddyy`, used in link file names.
    pub fn file_label(&self) -> String {
        format!(
            "{}-{}",
            self.start.format("%m%d%y"),
            self.end.format("%m%d%y")
        )
    }
}

/// How a harvest walks through descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalPlan {
    /// `PageIndex(1)..=PageIndex(max)`, stopped early by the empty-page rule
    Pages { max: u32 },
    /// Every date of the range, always visited in full
    Dates(DateRange),
}

impl TraversalPlan {
    pub fn descriptors(&self) -> Box<dyn Iterator<Item = QueryDescriptor> + Send> {
        match *self {
            Self::Pages { max } => Box::new((1..=max).map(QueryDescriptor::PageIndex)),
            Self::Dates(range) => Box::new(range.days().map(QueryDescriptor::CalendarDate)),
        }
    }

    /// Whether two consecutive empty descriptors end the traversal.
    pub fn stops_on_empty(&self) -> bool {
        matches!(self, Self::Pages { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_range() {
        let range = DateRange::parse("11/01/2016 11/03/2016").unwrap();
        assert_eq!(range.start, date(2016, 11, 1));
        assert_eq!(range.end, date(2016, 11, 3));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(DateRange::parse("11/01/2016").is_err());
        assert!(DateRange::parse("2016-11-01 2016-11-03").is_err());
        assert!(DateRange::parse("13/01/2016 11/03/2016").is_err());
        assert!(DateRange::parse("").is_err());
    }

    #[test]
    fn test_date_plan_is_complete() {
        let plan = TraversalPlan::Dates(DateRange::new(date(2016, 11, 1), date(2016, 11, 3)));
        let descriptors: Vec<_> = plan.descriptors().collect();
        assert_eq!(
            descriptors,
            vec![
                QueryDescriptor::CalendarDate(date(2016, 11, 1)),
                QueryDescriptor::CalendarDate(date(2016, 11, 2)),
                QueryDescriptor::CalendarDate(date(2016, 11, 3)),
            ]
        );
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let range = DateRange::new(date(2016, 11, 3), date(2016, 11, 1));
        assert_eq!(range.days().count(), 0);
    }

    #[test]
    fn test_range_crosses_month_boundary() {
        let range = DateRange::new(date(2016, 10, 30), date(2016, 11, 2));
        assert_eq!(range.days().count(), 4);
    }

    #[test]
    fn test_page_plan_bounds() {
        let plan = TraversalPlan::Pages { max: 3 };
        let descriptors: Vec<_> = plan.descriptors().collect();
        assert_eq!(
            descriptors,
            vec![
                QueryDescriptor::PageIndex(1),
                QueryDescriptor::PageIndex(2),
                QueryDescriptor::PageIndex(3),
            ]
        );
        assert!(plan.stops_on_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(QueryDescriptor::PageIndex(4).to_string(), "page 4");
        assert_eq!(
            QueryDescriptor::CalendarDate(date(2016, 11, 1)).to_string(),
            "archive date 11/1/2016"
        );
        assert_eq!(
            DateRange::new(date(2016, 11, 1), date(2016, 11, 3)).file_label(),
            "110116-110316"
        );
    }
}
