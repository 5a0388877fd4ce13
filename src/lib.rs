//! # datepicker
//!
//! A form control for entering dates the way people actually type them.
//!
//! Users type `5.3.2024`, `5. 3. 2024`, `5-3-2024` or just `5.3`. [`DatePicker`] turns that into a
//! [`chrono::NaiveDate`], keeps what was typed so "filled but not a date" can be told apart from
//! "empty", renders an HTML `<input>` with `min`/`max` taken from its rules, and provides the
//! validators a form runs on submit.
//!
//! ## Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use datepicker::prelude::*;
//!
//! let mut picker = DatePicker::new("birthday")
//!     .with_clock(Clock::Fixed(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()));
//!
//! // every birthday must be a real date, and, once given, no earlier than 1900
//! let id = picker.base().id().clone();
//! picker
//!     .rules_mut()
//!     .add_rule(Operation::Valid, None)
//!     .add_condition(Operation::Filled, &id, |rules| {
//!         let min = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap();
//!         rules.add_rule(Operation::Range(DateRange::since(min)), None);
//!     });
//!
//! picker.set_value("17. 11. 1989");
//! assert_eq!(NaiveDate::from_ymd_opt(1989, 11, 17), picker.value());
//! assert_eq!(Some("1. 1. 1900"), picker.control().get("min"));
//! assert!(picker.validate().is_ok());
//!
//! picker.set_value("31. 2. 1989");
//! assert_eq!(None, picker.value());
//! assert!(picker.is_filled());
//! assert!(picker.validate().is_err());
//! ```
//!
//! ## Accepted input
//!
//! | Input | Value |
//! |---|---|
//! | `5.3.2024`, `5. 3. 2024`, `05-03-2024`, `5 3 2024` | 2024-03-05 |
//! | `5.3`, `5.3.` | March 5th of the [`Clock`]'s current year |
//! | `2024-03-05`, `2024-03-05T10:00` | 2024-03-05 |
//! | `32.13.2024`, `5.3.24`, `abc` | none (but the field counts as filled) |
//! | empty text, `None` | none |
//! | a [`NaiveDate`](chrono::NaiveDate) | that date |
//! | an `i64` epoch timestamp | the date it falls on |
//!
//! Dates are written back out (in the `min`, `max` and `value` attributes) as `D. M. YYYY`, which
//! the control reads again unchanged.
//!
//! ## Prelude
//!
//! datepicker provides a prelude module for convenience:
//!
//! ```
//! use datepicker::prelude::*;
//! ```
#![warn(missing_docs)]

mod control;
mod date;
mod error;
mod html;
mod picker;
mod range;
mod rules;
mod value;

pub use crate::control::BaseControl;
pub use crate::date::{format_w3c, parse_date, Clock, W3C_DATE_FORMAT};
pub use crate::error::{DateError, RangeError, ValidationError};
pub use crate::html::Html;
pub use crate::picker::{
    validate_filled, validate_range, validate_valid, DatePicker, DEFAULT_CLASS_NAME,
};
pub use crate::range::DateRange;
pub use crate::rules::{ControlId, Operation, Rule, RuleTarget, Rules};
pub use crate::value::{normalize, FieldInput, Normalized};

/// A convenience module appropriate for glob imports (`use datepicker::prelude::*;`).
pub mod prelude {
    #[doc(no_inline)]
    pub use crate::Clock;
    #[doc(no_inline)]
    pub use crate::ControlId;
    #[doc(no_inline)]
    pub use crate::DatePicker;
    #[doc(no_inline)]
    pub use crate::DateRange;
    #[doc(no_inline)]
    pub use crate::FieldInput;
    #[doc(no_inline)]
    pub use crate::Operation;
    #[doc(no_inline)]
    pub use crate::Rule;
    #[doc(no_inline)]
    pub use crate::Rules;
    #[doc(no_inline)]
    pub use crate::ValidationError;
}
