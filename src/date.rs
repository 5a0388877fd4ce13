use crate::error::DateError;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// The `D. M. YYYY` pattern (day and month not zero-padded, year padded to 4 digits) used for the
/// `min`, `max` and `value` attributes of the rendered input and for raw values derived from
/// structured dates.
///
/// See the [W3C date string microsyntax](http://dev.w3.org/html5/spec/common-microsyntaxes.html#valid-date-string).
pub const W3C_DATE_FORMAT: &str = "%-d. %-m. %Y";

/// Formats a date with [`W3C_DATE_FORMAT`].
///
/// ```
/// use chrono::NaiveDate;
/// use datepicker::format_w3c;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
/// assert_eq!("5. 3. 2024", format_w3c(&date));
/// ```
pub fn format_w3c(date: &NaiveDate) -> String {
    date.format(W3C_DATE_FORMAT).to_string()
}

/// Parses an explicit date: either `D. M. YYYY` (any of `.`, `-` or space as separator) or ISO
/// `YYYY-MM-DD`. Unlike user input, the year is mandatory here.
///
/// # Errors
///
/// - Returns [`DateError::InvalidDateArguments`] if the text has the right shape but names a day
///   that does not exist, like `30. 2. 2024`.
/// - Returns [`DateError::UnparseableDate`] if the text matches neither form.
pub fn parse_date(text: &str) -> Result<NaiveDate, DateError> {
    if let Some(loose @ LooseDate { year: Some(year), .. }) = match_loose(text) {
        return loose.resolve(year).ok_or(DateError::InvalidDateArguments {
            year,
            month: loose.month,
            day: loose.day,
        });
    }

    coerce_strict(text).ok_or_else(|| DateError::UnparseableDate {
        date_string: text.to_owned(),
    })
}

fn loose_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // ascii digits only: `\d` would also accept other scripts' digits
        Regex::new(r"^(?P<dd>[0-9]{1,2})[. -] *(?P<mm>[0-9]{1,2})(?:[. -] *(?P<yyyy>[0-9]{4})?)?$")
            .expect("loose date pattern should compile")
    })
}

/// Day, month and optional year pulled out of loosely-formatted text. Not yet checked to be a real
/// date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LooseDate {
    pub(crate) day: u32,
    pub(crate) month: u32,
    pub(crate) year: Option<i32>,
}

impl LooseDate {
    /// Returns the calendar date, filling in `default_year` if the text had none, or `None` if the
    /// components don't name a real day.
    pub(crate) fn resolve(&self, default_year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year.unwrap_or(default_year), self.month, self.day)
    }
}

/// Matches `D.M`, `D.M.` or `D.M.YYYY` style text, where each separator is one of `.`, `-` or a
/// space, optionally followed by more spaces.
pub(crate) fn match_loose(text: &str) -> Option<LooseDate> {
    let captures = loose_pattern().captures(text)?;
    let day = captures.name("dd")?.as_str().parse().ok()?;
    let month = captures.name("mm")?.as_str().parse().ok()?;
    let year = match captures.name("yyyy") {
        Some(year) => Some(year.as_str().parse().ok()?),
        None => None,
    };
    Some(LooseDate { day, month, year })
}

/// Strict coercion for text that isn't in the loose format. Accepts the ISO date that native HTML5
/// date inputs submit, and an ISO date-time whose time part is dropped.
pub(crate) fn coerce_strict(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Where "today" comes from. Used to fill in the year when the user omits it, and to turn epoch
/// timestamps into calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    /// The current date in the system's local timezone at the time of each call.
    #[default]
    Local,
    /// The current date in UTC at the time of each call.
    Utc,
    /// A fixed date. Timestamps are read in UTC.
    Fixed(NaiveDate),
}

impl Clock {
    /// Returns today's date according to this clock.
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::Local => Local::now().date_naive(),
            Clock::Utc => Utc::now().date_naive(),
            Clock::Fixed(date) => *date,
        }
    }

    /// Returns the calendar date of an epoch timestamp (in seconds) in this clock's zone, or `None`
    /// if the timestamp is out of range.
    pub(crate) fn date_of_timestamp(&self, timestamp: i64) -> Option<NaiveDate> {
        let utc = DateTime::<Utc>::from_timestamp(timestamp, 0)?;
        Some(match self {
            Clock::Local => utc.with_timezone(&Local).date_naive(),
            Clock::Utc | Clock::Fixed(_) => utc.date_naive(),
        })
    }
}
