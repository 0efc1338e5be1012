//! Calendar arithmetic
//!
//! Dates are plain `{year, month, day}` triples with 1-based months. Weekday
//! and month-length questions are answered by `chrono`.
//!
//! ```rust
//! use tessel_calendar::date::{calendarize, WeekStart, YearMonth};
//!
//! let weeks = calendarize(YearMonth::new(2020, 1), WeekStart::Sunday).unwrap();
//! assert_eq!(weeks[0], [0, 0, 0, 1, 2, 3, 4]);
//! assert_eq!(weeks.len(), 5);
//! ```

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Deserialize;

use crate::error::{CalendarError, Result};

/// A day on the calendar
///
/// Field order makes the derived ordering chronological.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl CalendarDate {
    /// Build a date, rejecting triples that do not exist
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self::from)
            .ok_or(CalendarError::InvalidDate { year, month, day })
    }

    pub fn year_month(self) -> YearMonth {
        YearMonth {
            year: self.year,
            month: self.month,
        }
    }

    pub fn to_naive(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

pub fn dates_match(a: &CalendarDate, b: &CalendarDate) -> bool {
    a == b
}

pub fn date_gt(a: &CalendarDate, b: &CalendarDate) -> bool {
    a > b
}

pub fn date_gte(a: &CalendarDate, b: &CalendarDate) -> bool {
    a >= b
}

pub fn date_lt(a: &CalendarDate, b: &CalendarDate) -> bool {
    a < b
}

pub fn date_lte(a: &CalendarDate, b: &CalendarDate) -> bool {
    a <= b
}

/// An ordered pair of dates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: CalendarDate,
    pub end: CalendarDate,
}

/// Order two dates into a range
pub fn dates_as_range(a: CalendarDate, b: CalendarDate) -> DateRange {
    if date_lte(&a, &b) {
        DateRange { start: a, end: b }
    } else {
        DateRange { start: b, end: a }
    }
}

/// A month of a particular year
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Move by `months`, wrapping into neighbouring years
    pub fn offset(self, months: i32) -> Self {
        let index = self.year * 12 + (self.month as i32 - 1) + months;
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// The given day of this month; not validated
    pub fn day(self, day: u32) -> CalendarDate {
        CalendarDate {
            year: self.year,
            month: self.month,
            day,
        }
    }

    fn first_day(self) -> Result<NaiveDate> {
        if !(1..=12).contains(&self.month) {
            return Err(CalendarError::MonthOutOfRange(self.month));
        }
        NaiveDate::from_ymd_opt(self.year, self.month, 1).ok_or(CalendarError::InvalidDate {
            year: self.year,
            month: self.month,
            day: 1,
        })
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// First column of a calendar week
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl WeekStart {
    pub fn weekday(self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
            WeekStart::Tuesday => Weekday::Tue,
            WeekStart::Wednesday => Weekday::Wed,
            WeekStart::Thursday => Weekday::Thu,
            WeekStart::Friday => Weekday::Fri,
            WeekStart::Saturday => Weekday::Sat,
        }
    }

    /// Days between Sunday and this weekday
    pub fn offset(self) -> u32 {
        self.weekday().num_days_from_sunday()
    }
}

pub fn days_in_month(month: YearMonth) -> Result<u32> {
    let first = month.first_day()?;
    let next = month.offset(1).first_day()?;
    Ok(next.signed_duration_since(first).num_days() as u32)
}

/// Lay a month out in weeks of seven days, `0` marking padding cells
pub fn calendarize(month: YearMonth, week_start: WeekStart) -> Result<Vec<[u32; 7]>> {
    let first = month.first_day()?;
    let days = days_in_month(month)?;
    let mut lead = ((first.weekday().num_days_from_sunday() + 7 - week_start.offset()) % 7) as usize;

    let mut weeks = Vec::with_capacity(6);
    let mut day = 0;
    while day < days {
        let mut week = [0; 7];
        for cell in week.iter_mut().skip(lead) {
            day += 1;
            if day <= days {
                *cell = day;
            }
        }
        lead = 0;
        weeks.push(week);
    }
    Ok(weeks)
}

/// [`calendarize`] with the padding as `None` and days as full dates
pub fn month_weeks(month: YearMonth, week_start: WeekStart) -> Result<Vec<[Option<CalendarDate>; 7]>> {
    Ok(calendarize(month, week_start)?
        .into_iter()
        .map(|week| week.map(|day| (day != 0).then(|| month.day(day))))
        .collect())
}
