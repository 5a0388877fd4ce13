use crate::{
    control::BaseControl,
    date::{format_w3c, Clock},
    error::ValidationError,
    html::Html,
    range::DateRange,
    rules::{ControlId, Operation, RuleTarget, Rules},
    value::{is_empty_raw, normalize, FieldInput, Normalized},
};
use chrono::NaiveDate;

/// The class token added to the rendered input unless configured otherwise.
pub const DEFAULT_CLASS_NAME: &str = "date";

/// A form control for entering a date.
///
/// The user can type the date loosely: `5.3.2024`, `5. 3. 2024`, `5-3-2024`, `5 3 2024`, or just
/// `5.3` for the current year. The ISO `2024-03-05` that browsers' native date inputs submit works
/// too. Whatever was typed is kept as the *raw value*, so a field holding text that isn't a date
/// still counts as filled.
///
/// The rendered `<input>` carries `min`/`max` attributes for the tightest range the control's
/// rules allow, including ranges that only apply once the field is filled.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use datepicker::{validate_filled, validate_valid, Clock, DatePicker, DateRange, Operation};
///
/// let today = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
/// let mut picker = DatePicker::new("departure").with_clock(Clock::Fixed(today));
/// picker
///     .rules_mut()
///     .add_rule(Operation::Range(DateRange::since(today)), None);
///
/// picker.set_value("5.3");
/// assert_eq!(NaiveDate::from_ymd_opt(2030, 3, 5), picker.value());
/// assert_eq!(
///     r#"<input type="text" name="departure" id="frm-departure" class="date" min="1. 1. 2030" value="5. 3. 2030">"#,
///     picker.control().to_string()
/// );
///
/// picker.set_value("32.13.");
/// assert_eq!(None, picker.value());
/// assert_eq!("32.13.", picker.raw_value());
/// assert!(validate_filled(&picker));
/// assert!(!validate_valid(&picker));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePicker {
    base: BaseControl,
    value: Option<NaiveDate>,
    raw_value: String,
    class_name: String,
    clock: Clock,
}

impl DatePicker {
    /// Creates an empty date picker named `name`, using the local clock.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: BaseControl::new(name),
            value: None,
            raw_value: String::new(),
            class_name: DEFAULT_CLASS_NAME.to_owned(),
            clock: Clock::default(),
        }
    }

    /// Returns this picker with `clock` answering "what year is it" and reading timestamps.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Returns this picker with `class_name` as its class token.
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    /// Returns the class token added to the rendered input.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Sets the class token added to the rendered input.
    pub fn set_class_name(&mut self, class_name: impl Into<String>) -> &mut Self {
        self.class_name = class_name.into();
        self
    }

    /// Returns the clock.
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Sets the value from text, a timestamp, a date, or nothing. See [`normalize`] for how each
    /// is read.
    pub fn set_value(&mut self, input: impl Into<FieldInput>) -> &mut Self {
        let Normalized { value, raw } = normalize(input.into(), &self.clock);
        self.value = value;
        self.raw_value = raw;
        self
    }

    /// Returns the date, or `None` if nothing or something that isn't a date was entered.
    pub fn value(&self) -> Option<NaiveDate> {
        self.value
    }

    /// Returns what was entered, unfiltered. For values set from a date or a timestamp, this is the
    /// date formatted as `D. M. YYYY`.
    pub fn raw_value(&self) -> &str {
        &self.raw_value
    }

    /// Returns the wrapped base control.
    pub fn base(&self) -> &BaseControl {
        &self.base
    }

    /// Returns the wrapped base control for changing.
    pub fn base_mut(&mut self) -> &mut BaseControl {
        &mut self.base
    }

    /// Returns the control's rules.
    pub fn rules(&self) -> &Rules {
        self.base.rules()
    }

    /// Returns the control's rules for changing.
    pub fn rules_mut(&mut self) -> &mut Rules {
        self.base.rules_mut()
    }

    /// Makes the field required, failing with `message` when empty. `None` makes it optional.
    pub fn set_required(&mut self, message: Option<&str>) -> &mut Self {
        self.base.rules_mut().set_required(message);
        self
    }

    /// Returns the tightest range of dates the rules allow. See [`Rules::extract_range`].
    pub fn range(&self) -> DateRange {
        self.base.rules().extract_range(self.base.id())
    }

    /// Builds the `<input>` element.
    ///
    /// On top of the base control's attributes, the class token is added to `class` (never
    /// twice), `min` and `max` are set from [`Self::range`], and `value` is set if the control
    /// holds a date. Dates are formatted as `D. M. YYYY`.
    pub fn control(&self) -> Html {
        let mut el = self.base.control();
        el.add_class(&self.class_name);

        let range = self.range();
        if let Some(min) = range.min() {
            el.set("min", format_w3c(&min));
        }
        if let Some(max) = range.max() {
            el.set("max", format_w3c(&max));
        }
        if let Some(value) = &self.value {
            el.set("value", format_w3c(value));
        }
        el
    }

    /// Returns true if anything was entered.
    pub fn is_filled(&self) -> bool {
        validate_filled(self)
    }

    /// Runs the control's rules and returns the first failure. Disabled controls always pass.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.base.is_disabled() {
            return Ok(());
        }
        self.base.rules().validate(self)
    }
}

impl RuleTarget for DatePicker {
    fn id(&self) -> &ControlId {
        self.base.id()
    }

    fn label(&self) -> &str {
        self.base.label()
    }

    fn is_filled(&self) -> bool {
        validate_filled(self)
    }

    fn evaluate(&self, operation: &Operation) -> bool {
        match operation {
            Operation::Filled => validate_filled(self),
            Operation::Valid => validate_valid(self),
            Operation::Range(range) => validate_range(self, range),
        }
    }
}

/// Did the user enter anything? The entry doesn't have to be a valid date, but a lone `0` counts
/// as nothing.
pub fn validate_filled(picker: &DatePicker) -> bool {
    !is_empty_raw(&picker.raw_value)
}

/// Is the entry a valid date? An empty entry is valid too.
pub fn validate_valid(picker: &DatePicker) -> bool {
    is_empty_raw(&picker.raw_value) || picker.value.is_some()
}

/// Is the date within `range`, bounds included? A picker without a date is never in range.
pub fn validate_range(picker: &DatePicker, range: &DateRange) -> bool {
    picker.value.is_some_and(|value| range.contains(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[fixture]
    fn picker() -> DatePicker {
        DatePicker::new("date").with_clock(Clock::Fixed(ymd(2030, 7, 14)))
    }

    #[rstest]
    #[case("5.3.2024", Some(ymd(2024, 3, 5)), true, true)]
    #[case("5.3", Some(ymd(2030, 3, 5)), true, true)]
    #[case("32.13.2024", None, true, false)]
    #[case("abc", None, true, false)]
    #[case("", None, false, true)]
    #[case("0", None, false, true)]
    fn test_set_value_text(
        mut picker: DatePicker,
        #[case] text: &str,
        #[case] value: Option<NaiveDate>,
        #[case] filled: bool,
        #[case] valid: bool,
    ) {
        picker.set_value(text);
        assert_eq!(value, picker.value());
        assert_eq!(text, picker.raw_value());
        assert_eq!(filled, validate_filled(&picker));
        assert_eq!(valid, validate_valid(&picker));
    }

    #[rstest]
    fn test_zero_is_optional_empty(mut picker: DatePicker) {
        picker
            .rules_mut()
            .add_rule(Operation::Valid, None)
            .add_rule(Operation::Range(DateRange::since(ymd(2030, 1, 1))), None);
        picker.set_value("0");
        assert_eq!(Ok(()), picker.validate());
        assert_eq!(None, picker.control().get("value"));

        picker.set_required(Some("Required"));
        assert!(picker.validate().is_err());
    }

    #[test]
    fn test_with_clock() {
        let clock = Clock::Fixed(ymd(2012, 6, 1));
        let mut picker = DatePicker::new("date").with_clock(clock);
        assert_eq!(&clock, picker.clock());
        picker.set_value("29.2");
        assert_eq!(Some(ymd(2012, 2, 29)), picker.value());
    }

    #[rstest]
    fn test_set_value_none(mut picker: DatePicker) {
        picker.set_value("5.3.2024").set_value(None::<&str>);
        assert_eq!(None, picker.value());
        assert_eq!("", picker.raw_value());
        assert!(!picker.is_filled());
        assert!(validate_valid(&picker));
    }

    #[rstest]
    fn test_set_value_date(mut picker: DatePicker) {
        picker.set_value(ymd(2024, 12, 24));
        assert_eq!(Some(ymd(2024, 12, 24)), picker.value());
        assert_eq!("24. 12. 2024", picker.raw_value());
        assert!(validate_filled(&picker));
        assert!(validate_valid(&picker));
    }

    #[rstest]
    fn test_set_value_timestamp(mut picker: DatePicker) {
        picker.set_value(1_709_640_000_i64);
        assert_eq!(Some(ymd(2024, 3, 5)), picker.value());
        assert_eq!("5. 3. 2024", picker.raw_value());
    }

    #[rstest]
    fn test_validate_range(mut picker: DatePicker) {
        let range = DateRange::new(Some(ymd(2024, 1, 1)), Some(ymd(2024, 12, 31))).unwrap();

        picker.set_value("1.1.2024");
        assert!(validate_range(&picker, &range));
        picker.set_value("31.12.2024");
        assert!(validate_range(&picker, &range));
        picker.set_value("1.1.2025");
        assert!(!validate_range(&picker, &range));
        picker.set_value("nonsense");
        assert!(!validate_range(&picker, &range));
    }

    #[rstest]
    fn test_class_name_never_duplicated(mut picker: DatePicker) {
        picker.base_mut().set_attribute("class", "wide date");
        picker.set_class_name("date").set_class_name("date");
        assert_eq!("date", picker.class_name());
        assert_eq!(Some("wide date"), picker.control().get("class"));

        picker.set_class_name("calendar");
        assert_eq!(Some("wide date calendar"), picker.control().get("class"));
    }

    #[rstest]
    fn test_with_class_name(picker: DatePicker) {
        let picker = picker.with_class_name("datepicker");
        assert_eq!(Some("datepicker"), picker.control().get("class"));
    }

    #[rstest]
    fn test_control_range_and_value(mut picker: DatePicker) {
        let id = picker.base().id().clone();
        picker
            .rules_mut()
            .add_rule(Operation::Range(DateRange::until(ymd(2025, 12, 31))), None)
            .add_condition(Operation::Filled, &id, |rules| {
                rules.add_rule(Operation::Range(DateRange::since(ymd(2020, 1, 1))), None);
            });
        picker.set_value("2. 2. 2022");

        let el = picker.control();
        assert_eq!(Some("1. 1. 2020"), el.get("min"));
        assert_eq!(Some("31. 12. 2025"), el.get("max"));
        assert_eq!(Some("2. 2. 2022"), el.get("value"));
    }

    #[rstest]
    fn test_control_without_value(mut picker: DatePicker) {
        picker.set_value("not a date");
        let el = picker.control();
        assert_eq!(None, el.get("value"));
        assert_eq!(None, el.get("min"));
        assert_eq!(None, el.get("max"));
    }

    #[rstest]
    fn test_rendered_value_parses_back(mut picker: DatePicker) {
        for date in [ymd(2024, 3, 5), ymd(1999, 12, 31), ymd(2024, 2, 29)] {
            picker.set_value(date);
            let rendered = picker.control().get("value").unwrap().to_owned();
            picker.set_value(rendered);
            assert_eq!(Some(date), picker.value());
        }
    }

    #[rstest]
    fn test_validate(mut picker: DatePicker) {
        let id = picker.base().id().clone();
        picker.base_mut().set_label("Arrival");
        picker
            .set_required(Some("%label is required."))
            .rules_mut()
            .add_rule(Operation::Valid, Some("%label should be a date."))
            .add_condition(Operation::Filled, &id, |rules| {
                rules.add_rule(Operation::Range(DateRange::since(ymd(2030, 1, 1))), None);
            });

        let message = |picker: &DatePicker| picker.validate().map_err(|e| e.to_string());

        assert_eq!(Err("Arrival is required.".to_owned()), message(&picker));
        picker.set_value("31.2.");
        assert_eq!(Err("Arrival should be a date.".to_owned()), message(&picker));
        picker.set_value("31.12.2029");
        assert_eq!(
            Err("Please enter a date on or after 1. 1. 2030.".to_owned()),
            message(&picker)
        );
        picker.set_value("1.1.");
        assert_eq!(Ok(()), message(&picker));
    }

    #[rstest]
    fn test_validate_optional(mut picker: DatePicker) {
        picker
            .rules_mut()
            .add_rule(Operation::Valid, None)
            .add_rule(Operation::Range(DateRange::since(ymd(2030, 1, 1))), None);

        assert_eq!(Ok(()), picker.validate());
        picker.set_value("1.1.2000");
        assert!(picker.validate().is_err());
    }

    #[rstest]
    fn test_validate_disabled(mut picker: DatePicker) {
        picker.set_required(Some("Required"));
        assert!(picker.validate().is_err());
        picker.base_mut().set_disabled(true);
        assert_eq!(Ok(()), picker.validate());
    }
}
