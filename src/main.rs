use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use datepicker::{
    format_w3c, parse_date, Clock, DateError, DatePicker, DateRange, FieldInput, Operation,
    RangeError,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("{0}")]
    Date(#[from] DateError),

    #[error("{0}")]
    Range(#[from] RangeError),

    #[error("Timestamp `{input}` should be a whole number of seconds")]
    Timestamp {
        input: String,
        source: std::num::ParseIntError,
    },
}

/// What goes into the field and what "today" is.
#[derive(Args, Debug)]
struct FieldArgs {
    /// The field's input, as a user would type it. Pass an empty string for an empty field.
    input: String,

    /// Read INPUT as a Unix timestamp in seconds instead of typed text.
    #[arg(long)]
    timestamp: bool,

    /// The date to treat as today, used when INPUT has no year. Defaults to the local date.
    #[arg(long, value_name = "DATE")]
    today: Option<String>,

    /// Use the current UTC date as today. Exclusive with `--today`.
    #[arg(long, conflicts_with = "today")]
    utc: bool,
}

impl FieldArgs {
    fn clock(&self) -> Result<Clock, CliError> {
        if self.utc {
            return Ok(Clock::Utc);
        }
        Ok(match &self.today {
            Some(today) => Clock::Fixed(parse_date(today)?),
            None => Clock::Local,
        })
    }

    fn field_input(&self) -> Result<FieldInput, CliError> {
        if self.timestamp {
            let timestamp = self
                .input
                .trim()
                .parse::<i64>()
                .map_err(|source| CliError::Timestamp {
                    input: self.input.clone(),
                    source,
                })?;
            return Ok(FieldInput::Timestamp(timestamp));
        }
        Ok(FieldInput::Text(self.input.clone()))
    }
}

/// Rules to attach to the field. Dates are `D. M. YYYY` or `YYYY-MM-DD`.
#[derive(Args, Debug)]
struct RuleArgs {
    /// The field must be filled.
    #[arg(short, long)]
    required: bool,

    /// Earliest allowed date.
    #[arg(long, value_name = "DATE")]
    min: Option<String>,

    /// Latest allowed date.
    #[arg(long, value_name = "DATE")]
    max: Option<String>,

    /// Earliest allowed date, checked only once the field is filled.
    #[arg(long, value_name = "DATE")]
    when_filled_min: Option<String>,

    /// Latest allowed date, checked only once the field is filled.
    #[arg(long, value_name = "DATE")]
    when_filled_max: Option<String>,
}

fn parse_opt_date(date: &Option<String>) -> Result<Option<NaiveDate>, CliError> {
    Ok(date.as_deref().map(parse_date).transpose()?)
}

impl RuleArgs {
    fn apply(&self, picker: &mut DatePicker) -> Result<(), CliError> {
        let id = picker.base().id().clone();
        let always = DateRange::new(parse_opt_date(&self.min)?, parse_opt_date(&self.max)?)?;
        let when_filled = DateRange::new(
            parse_opt_date(&self.when_filled_min)?,
            parse_opt_date(&self.when_filled_max)?,
        )?;

        if self.required {
            picker.set_required(Some("This field is required."));
        }
        let rules = picker.rules_mut();
        rules.add_rule(Operation::Valid, None);
        if always != DateRange::unbounded() {
            rules.add_rule(Operation::Range(always), None);
        }
        if when_filled != DateRange::unbounded() {
            rules.add_condition(Operation::Filled, &id, |rules| {
                rules.add_rule(Operation::Range(when_filled), None);
            });
        }
        Ok(())
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log more. Repeat for more detail. `RUST_LOG` is used when not given.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Prints the date INPUT stands for as `D. M. YYYY`, `invalid` or `empty`.
    ///
    /// Exits with 0 if INPUT is a date, 1 otherwise.
    Parse {
        #[command(flatten)]
        field: FieldArgs,
    },

    /// Validates INPUT against the given rules, printing `true`, or `false` and the reason.
    ///
    /// Exits with 0 if valid, 1 otherwise.
    Validate {
        #[command(flatten)]
        field: FieldArgs,

        #[command(flatten)]
        rules: RuleArgs,
    },

    /// Prints the `<input>` element for a field holding INPUT.
    Render {
        #[command(flatten)]
        field: FieldArgs,

        #[command(flatten)]
        rules: RuleArgs,

        /// The field's name.
        #[arg(short, long, default_value = "date")]
        name: String,

        /// The class token to add to the element.
        #[arg(short, long, default_value = datepicker::DEFAULT_CLASS_NAME)]
        class: String,
    },
}

type Output = (String, i32);

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match do_work(cli) {
        Ok((output, exit_code)) => {
            println!("{output}");
            std::process::exit(exit_code);
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn new_picker(name: &str, field: &FieldArgs) -> Result<DatePicker, CliError> {
    Ok(DatePicker::new(name).with_clock(field.clock()?))
}

fn do_work(cli: Cli) -> Result<Output, CliError> {
    debug!(command = ?cli.command, "running");
    match cli.command {
        Commands::Parse { field } => {
            let mut picker = new_picker("date", &field)?;
            picker.set_value(field.field_input()?);
            Ok(match picker.value() {
                Some(value) => (format_w3c(&value), 0),
                None if picker.is_filled() => ("invalid".to_string(), 1),
                None => ("empty".to_string(), 1),
            })
        }
        Commands::Validate { field, rules } => {
            let mut picker = new_picker("date", &field)?;
            rules.apply(&mut picker)?;
            picker.set_value(field.field_input()?);
            Ok(match picker.validate() {
                Ok(()) => ("true".to_string(), 0),
                Err(e) => (format!("false\n{e}"), 1),
            })
        }
        Commands::Render {
            field,
            rules,
            name,
            class,
        } => {
            let mut picker = new_picker(&name, &field)?.with_class_name(class);
            rules.apply(&mut picker)?;
            picker.set_value(field.field_input()?);
            Ok((picker.control().to_string(), 0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    fn run(args: &[&str]) -> Result<Output, CliError> {
        let argv = ["datepicker"]
            .into_iter()
            .chain(args.iter().copied())
            .chain(["--today", "2030-07-14"]);
        let cli = Cli::try_parse_from(argv).unwrap();
        do_work(cli)
    }

    #[rstest]
    #[case(&["parse", "5.3.2024"], "5. 3. 2024", 0)]
    #[case(&["parse", "5.3"], "5. 3. 2030", 0)]
    #[case(&["parse", "32.13.2024"], "invalid", 1)]
    #[case(&["parse", ""], "empty", 1)]
    #[case(&["parse", "0"], "empty", 1)]
    #[case(&["parse", "--timestamp", "0"], "1. 1. 1970", 0)]
    fn test_parse(#[case] args: &[&str], #[case] output: &str, #[case] exit_code: i32) {
        let (actual, actual_code) = run(args).unwrap();
        assert_eq!(output, actual);
        assert_eq!(exit_code, actual_code);
    }

    #[rstest]
    #[case(&["validate", ""], "true", 0)]
    #[case(&["validate", "", "--required"], "false\nThis field is required.", 1)]
    #[case(&["validate", "abc"], "false\nPlease enter a valid date.", 1)]
    #[case(&["validate", "1.1.2020", "--min", "1.1.2021"], "false\nPlease enter a date on or after 1. 1. 2021.", 1)]
    #[case(&["validate", "1.1.2022", "--min", "1.1.2021", "--when-filled-max", "2021-12-31"], "false\nPlease enter a date on or before 31. 12. 2021.", 1)]
    #[case(&["validate", "1.6.2021", "--min", "1.1.2021", "--when-filled-max", "2021-12-31"], "true", 0)]
    fn test_validate(#[case] args: &[&str], #[case] output: &str, #[case] exit_code: i32) {
        let (actual, actual_code) = run(args).unwrap();
        assert_eq!(output, actual);
        assert_eq!(exit_code, actual_code);
    }

    #[test]
    fn test_render() {
        let (html, _) = run(&[
            "render",
            "2.2.2022",
            "--name",
            "since",
            "--max",
            "31. 12. 2025",
            "--when-filled-min",
            "1. 1. 2020",
        ])
        .unwrap();
        assert_eq!(
            r#"<input type="text" name="since" id="frm-since" class="date" min="1. 1. 2020" max="31. 12. 2025" value="2. 2. 2022">"#,
            html
        );
    }

    #[test]
    fn test_bad_arguments() {
        assert!(matches!(
            run(&["validate", "1.1.2020", "--min", "soon"]),
            Err(CliError::Date(DateError::UnparseableDate { .. }))
        ));
        assert!(matches!(
            run(&["validate", "1.1.2020", "--min", "2.1.2020", "--max", "1.1.2020"]),
            Err(CliError::Range(RangeError::Inverted { .. }))
        ));
        assert!(matches!(
            run(&["parse", "--timestamp", "yesterday"]),
            Err(CliError::Timestamp { .. })
        ));
    }

    #[test]
    fn test_utc_conflicts_with_today() {
        let argv = ["datepicker", "parse", "5.3", "--utc", "--today", "1.1.2020"];
        assert!(Cli::try_parse_from(argv).is_err());
    }
}
