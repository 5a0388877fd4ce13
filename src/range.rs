use crate::{date::format_w3c, error::RangeError};
use chrono::NaiveDate;
use core::fmt::{self, Display};

/// An inclusive range of allowed dates. Either bound may be open.
///
/// A range built with [`DateRange::new`] is never inverted, but one produced by
/// [`DateRange::intersect`] can be: two rules may ask for more than any date can give. Such a range
/// contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DateRange {
    min: Option<NaiveDate>,
    max: Option<NaiveDate>,
}

impl DateRange {
    /// Creates a range, checking that `min` is not after `max`.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::Inverted`] if both bounds are given and `min > max`.
    pub fn new(min: Option<NaiveDate>, max: Option<NaiveDate>) -> Result<Self, RangeError> {
        match (min, max) {
            (Some(min), Some(max)) if min > max => Err(RangeError::Inverted { min, max }),
            _ => Ok(Self { min, max }),
        }
    }

    /// A range with no bounds.
    pub const fn unbounded() -> Self {
        Self {
            min: None,
            max: None,
        }
    }

    /// Every date on or after `min`.
    pub const fn since(min: NaiveDate) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    /// Every date on or before `max`.
    pub const fn until(max: NaiveDate) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    /// Returns the earliest allowed date, if any.
    pub const fn min(&self) -> Option<NaiveDate> {
        self.min
    }

    /// Returns the latest allowed date, if any.
    pub const fn max(&self) -> Option<NaiveDate> {
        self.max
    }

    /// Returns true if `date` lies within the range, bounds included.
    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.min.map_or(true, |min| min <= *date) && self.max.map_or(true, |max| *date <= max)
    }

    /// Returns true if no date can satisfy this range.
    pub fn is_empty(&self) -> bool {
        matches!((self.min, self.max), (Some(min), Some(max)) if min > max)
    }

    /// Narrows this range by `other`: the minimum only moves later, the maximum only moves earlier.
    /// On equal bounds this range's bound is kept.
    pub fn intersect(&self, other: &Self) -> Self {
        let min = match (self.min, other.min) {
            (Some(cur), Some(new)) if new > cur => Some(new),
            (None, new) => new,
            (cur, _) => cur,
        };
        let max = match (self.max, other.max) {
            (Some(cur), Some(new)) if new < cur => Some(new),
            (None, new) => new,
            (cur, _) => cur,
        };
        Self { min, max }
    }
}

impl Display for DateRange {
    /// Displays the bounds in `D. M. YYYY` format, like `[1. 1. 2020, 31. 12. 2025]`. An open
    /// bound shows as `*`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = |date: Option<NaiveDate>| date.as_ref().map_or("*".to_owned(), format_w3c);
        write!(f, "[{}, {}]", bound(self.min), bound(self.max))
    }
}
