//! Tessel Calendar Widgets
//!
//! Calendar components built on `tessel_core`:
//!
//! - **[`Month`]**: one month grid with previous/next paging and range
//!   highlighting
//! - **[`DateRangeInput`]**: two months side by side, picking a range by
//!   clicking or dragging and emitting `change` events
//! - **Calendar arithmetic**: [`calendarize`] and friends
//! - **Locale**: month and weekday names plus the first day of the week,
//!   loadable from TOML and provided through component context
//!
//! # Example
//!
//! ```rust
//! use tessel_calendar::{CalendarDate, DateRange, DateRangeInput, DateRangeInputs};
//! use tessel_core::{MountOptions, Runtime};
//!
//! let runtime = Runtime::new();
//! let root = runtime.host().borrow().root();
//! let input = runtime
//!     .mount(
//!         MountOptions::<DateRangeInput>::new(DateRangeInputs {
//!             start: Some(CalendarDate::new(2020, 1, 15).unwrap()),
//!             end: Some(CalendarDate::new(2020, 2, 15).unwrap()),
//!             ..Default::default()
//!         })
//!         .target(root),
//!     )
//!     .unwrap();
//!
//! let _listener = input.add_event_listener("change", |event| {
//!     if let Some(range) = event.detail::<DateRange>() {
//!         println!("{} .. {}", range.start, range.end);
//!     }
//! });
//! assert_eq!(runtime.host().borrow().query_class(root, "week").len(), 10);
//! ```

pub mod date;
pub mod date_range;
pub mod error;
pub mod locale;
pub mod month;

pub use date::{
    calendarize, date_gt, date_gte, date_lt, date_lte, dates_as_range, dates_match,
    days_in_month, month_weeks, CalendarDate, DateRange, WeekStart, YearMonth,
};
pub use date_range::{get_display_range, DateRangeInput, DateRangeInputs};
pub use error::{CalendarError, Result};
pub use locale::{CalendarConfig, CONTEXT_KEY};
pub use month::{Month, MonthInputs, Week};
