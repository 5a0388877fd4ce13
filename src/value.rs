use crate::date::{self, format_w3c, Clock};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use tracing::debug;

/// Everything a [`DatePicker`](crate::DatePicker) value can be set from.
///
/// ```
/// use chrono::NaiveDate;
/// use datepicker::FieldInput;
///
/// let typed: FieldInput = "5. 3. 2024".into();
/// let structured: FieldInput = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().into();
/// let timestamp = FieldInput::Timestamp(1_709_640_000);
/// let cleared: FieldInput = None::<&str>.into();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    /// An already-structured date. Always valid.
    Date(NaiveDate),
    /// Seconds since the Unix epoch.
    Timestamp(i64),
    /// Text as the user typed it.
    Text(String),
    /// No value at all.
    Empty,
}

impl From<NaiveDate> for FieldInput {
    fn from(date: NaiveDate) -> Self {
        FieldInput::Date(date)
    }
}

impl From<NaiveDateTime> for FieldInput {
    fn from(datetime: NaiveDateTime) -> Self {
        FieldInput::Date(datetime.date())
    }
}

impl From<i64> for FieldInput {
    fn from(timestamp: i64) -> Self {
        FieldInput::Timestamp(timestamp)
    }
}

impl From<&str> for FieldInput {
    fn from(text: &str) -> Self {
        FieldInput::Text(text.to_owned())
    }
}

impl From<String> for FieldInput {
    fn from(text: String) -> Self {
        FieldInput::Text(text)
    }
}

impl<T: Into<FieldInput>> From<Option<T>> for FieldInput {
    fn from(input: Option<T>) -> Self {
        input.map_or(FieldInput::Empty, Into::into)
    }
}

/// The outcome of normalizing a [`FieldInput`]: the date, if one could be made, and the raw text
/// that stands for what the user entered.
///
/// `raw` is kept even when `value` is `None`, so "the user typed something that isn't a date" can
/// be told apart from "the user typed nothing".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Normalized {
    /// A real calendar date, or `None`.
    pub value: Option<NaiveDate>,
    /// The unfiltered input.
    pub raw: String,
}

/// Normalizes `input` into a date plus raw text. Never fails: input that can't be made into a date
/// yields `value: None`.
///
/// - Dates are taken as-is.
/// - Timestamps are converted to the date they fall on in `clock`'s zone.
/// - Empty input and empty text give no value and an empty raw string. The text `0` gives no value
///   and is kept as the raw string.
/// - Text is matched against `D.M[.YYYY]` (separators `.`, `-` or space); a missing year is taken
///   from `clock`. Other text gets a strict ISO `YYYY-MM-DD` attempt.
///
/// When the input wasn't text, the raw string is derived from the date with
/// [`W3C_DATE_FORMAT`](crate::W3C_DATE_FORMAT).
///
/// ```
/// use chrono::NaiveDate;
/// use datepicker::{normalize, Clock, FieldInput};
///
/// let clock = Clock::Fixed(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap());
/// let normalized = normalize(FieldInput::from("5.3"), &clock);
/// assert_eq!(NaiveDate::from_ymd_opt(2030, 3, 5), normalized.value);
/// assert_eq!("5.3", normalized.raw);
/// ```
pub fn normalize(input: FieldInput, clock: &Clock) -> Normalized {
    let (value, raw) = match input {
        FieldInput::Date(date) => (Some(date), None),
        FieldInput::Timestamp(timestamp) => {
            let value = clock.date_of_timestamp(timestamp);
            if value.is_none() {
                debug!(timestamp, "timestamp is out of range for a calendar date");
            }
            (value, None)
        }
        FieldInput::Empty => (None, Some(String::new())),
        FieldInput::Text(text) if is_empty_raw(&text) => (None, Some(text)),
        FieldInput::Text(text) => (normalize_text(&text, clock), Some(text)),
    };

    let raw = raw.unwrap_or_else(|| value.as_ref().map(format_w3c).unwrap_or_default());
    Normalized { value, raw }
}

/// Returns true if `raw` counts as nothing entered: the empty string or a lone `0`.
pub(crate) fn is_empty_raw(raw: &str) -> bool {
    raw.is_empty() || raw == "0"
}

fn normalize_text(text: &str, clock: &Clock) -> Option<NaiveDate> {
    if let Some(loose) = date::match_loose(text) {
        let value = loose.resolve(clock.today().year());
        if value.is_none() {
            debug!(text, ?loose, "input is not a calendar date");
        }
        return value;
    }

    let value = date::coerce_strict(text);
    if value.is_none() {
        debug!(text, "input is not in a recognized date format");
    }
    value
}
