use chrono::NaiveDate;

/// Errors that can occur when building a date from explicit, caller-supplied arguments.
///
/// Text typed into a [`DatePicker`](crate::DatePicker) never produces one of these: unparseable
/// user input resolves to an absent value instead.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum DateError {
    /// A date string could not be parsed.
    #[error("Date string `{date_string}` should be in format `YYYY-MM-DD` or `D. M. YYYY`")]
    UnparseableDate {
        /// The date string that could not be parsed.
        date_string: String,
    },

    /// Year, month and day do not form a real calendar date.
    #[error("Explicit year ({year}), month ({month}), and day ({day}) arguments cannot be made into a valid date")]
    InvalidDateArguments {
        /// The year argument.
        year: i32,
        /// The month argument.
        month: u32,
        /// The day argument.
        day: u32,
    },
}

/// Errors that can occur when building a [`DateRange`](crate::DateRange) from explicit bounds.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RangeError {
    /// The minimum is later than the maximum.
    #[error("Range minimum `{min}` should not be after maximum `{max}`")]
    Inverted {
        /// The requested minimum.
        min: NaiveDate,
        /// The requested maximum.
        max: NaiveDate,
    },
}

/// The first rule that failed during [`DatePicker::validate`](crate::DatePicker::validate).
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
#[error("{message}")]
pub struct ValidationError {
    /// The rule's message with its placeholders filled in.
    pub message: String,
}
