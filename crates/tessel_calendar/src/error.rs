//! Error types for tessel_calendar

use thiserror::Error;

/// Errors surfaced by the calendar widgets
#[derive(Error, Debug)]
pub enum CalendarError {
    /// A month number outside `1..=12`
    #[error("month must be between 1 and 12, got {0}")]
    MonthOutOfRange(u32),

    /// A year/month/day triple that is not a real date
    #[error("invalid date {year}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    /// Calendar configuration could not be parsed
    #[error("invalid calendar config: {0}")]
    Config(#[from] toml::de::Error),

    /// The component runtime failed
    #[error(transparent)]
    Runtime(#[from] tessel_core::RuntimeError),
}

/// Result type for tessel_calendar operations
pub type Result<T> = std::result::Result<T, CalendarError>;
