//! Month and weekday names
//!
//! A [`CalendarConfig`] is looked up from the component context under
//! [`CONTEXT_KEY`]; widgets fall back to the English defaults.
//!
//! ```rust
//! use tessel_calendar::locale::CalendarConfig;
//!
//! let config = CalendarConfig::from_toml_str(r#"week_start = "monday""#).unwrap();
//! assert_eq!(config.weekday_header().next(), Some("Mon"));
//! assert_eq!(config.month_name(1).unwrap(), "January");
//! ```

use serde::Deserialize;

use crate::date::WeekStart;
use crate::error::{CalendarError, Result};

/// Context key the widgets read their config from
pub const CONTEXT_KEY: &str = "calendar.config";

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Display names and week layout for the calendar widgets
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Month names, January first
    pub month_names: [String; 12],
    /// Short weekday names, Sunday first
    pub weekday_names: [String; 7],
    pub week_start: WeekStart,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            month_names: MONTH_NAMES.map(String::from),
            weekday_names: WEEKDAY_NAMES.map(String::from),
            week_start: WeekStart::default(),
        }
    }
}

impl CalendarConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Name of a 1-based month
    pub fn month_name(&self, month: u32) -> Result<&str> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::MonthOutOfRange(month));
        }
        Ok(&self.month_names[month as usize - 1])
    }

    /// Weekday names in column order
    pub fn weekday_header(&self) -> impl Iterator<Item = &str> + '_ {
        let offset = self.week_start.offset() as usize;
        (0..7).map(move |column| self.weekday_names[(offset + column) % 7].as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_name_bounds() {
        let config = CalendarConfig::default();
        assert_eq!(config.month_name(12).unwrap(), "December");
        assert!(matches!(config.month_name(0), Err(CalendarError::MonthOutOfRange(0))));
        assert!(matches!(config.month_name(13), Err(CalendarError::MonthOutOfRange(13))));
    }

    #[test]
    fn test_weekday_header_rotation() {
        let config = CalendarConfig {
            week_start: WeekStart::Saturday,
            ..CalendarConfig::default()
        };
        let header: Vec<&str> = config.weekday_header().collect();
        assert_eq!(header, vec!["Sat", "Sun", "Mon", "Tue", "Wed", "Thu", "Fri"]);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CalendarConfig::from_toml_str(
            r#"weekday_names = ["Di", "Lu", "Ma", "Me", "Je", "Ve", "Sa"]"#,
        )
        .unwrap();
        assert_eq!(config.month_name(3).unwrap(), "March");
        assert_eq!(config.weekday_header().next(), Some("Di"));
    }

    #[test]
    fn test_invalid_toml() {
        let err = CalendarConfig::from_toml_str("week_start = \"someday\"").unwrap_err();
        assert!(err.to_string().starts_with("invalid calendar config"));
    }
}
