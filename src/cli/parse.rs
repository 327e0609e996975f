//! Argument parsing shared by the command handlers.

use std::str::FromStr;

use akhra_domain::RecordId;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::CommandError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{input}` (expected YYYY-MM-DD)"))
    })
}

pub fn parse_amount(input: &str) -> Result<Decimal, CommandError> {
    Decimal::from_str(input.trim())
        .map_err(|_| CommandError::InvalidArguments(format!("invalid amount `{input}`")))
}

pub fn parse_id(kind: &str, input: &str) -> Result<RecordId, CommandError> {
    input
        .trim()
        .trim_start_matches('#')
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid {kind} id `{input}`")))
}

pub fn parse_year(input: &str) -> Result<i32, CommandError> {
    input
        .trim()
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid year `{input}`")))
}

/// Parses any `FromStr` type whose error displays a readable reason.
pub fn parse_enum<T>(input: &str) -> Result<T, CommandError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    input
        .parse()
        .map_err(|err: T::Err| CommandError::InvalidArguments(err.to_string()))
}

/// Which side of a journal line an amount goes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Debit,
    Credit,
}

impl FromStr for Side {
    type Err = CommandError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "dr" | "debit" => Ok(Side::Debit),
            "cr" | "credit" => Ok(Side::Credit),
            other => Err(CommandError::InvalidArguments(format!(
                "expected `dr` or `cr`, got `{other}`"
            ))),
        }
    }
}

/// `-` (or an empty string) stands for "no value".
pub fn optional_text(input: Option<&str>) -> Option<String> {
    input
        .map(str::trim)
        .filter(|value| !value.is_empty() && *value != "-")
        .map(str::to_string)
}

/// Removes `--flag value` from `args`, returning the value and the remaining arguments.
pub fn take_option<'a>(
    args: &[&'a str],
    flag: &str,
) -> Result<(Option<&'a str>, Vec<&'a str>), CommandError> {
    let mut rest = Vec::with_capacity(args.len());
    let mut value = None;
    let mut iter = args.iter().copied();
    while let Some(arg) = iter.next() {
        if arg == flag {
            value = Some(iter.next().ok_or_else(|| {
                CommandError::InvalidArguments(format!("`{flag}` needs a value"))
            })?);
        } else {
            rest.push(arg);
        }
    }
    Ok((value, rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn dates_and_amounts_parse() {
        assert_eq!(
            parse_date("2024-01-05").ok(),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
        assert!(parse_date("05/01/2024").is_err());
        assert_eq!(parse_amount("100.50").ok(), Some(dec!(100.50)));
        assert!(parse_amount("ten").is_err());
        assert_eq!(parse_id("journal", "#7").ok(), Some(7));
    }

    #[test]
    fn sides_accept_short_and_long_forms() {
        assert_eq!("DR".parse::<Side>().ok(), Some(Side::Debit));
        assert_eq!("credit".parse::<Side>().ok(), Some(Side::Credit));
        assert!("both".parse::<Side>().is_err());
    }

    #[test]
    fn options_are_pulled_out_of_positionals() {
        let (member, rest) =
            take_option(&["2024-01-05", "--member", "3", "Cash"], "--member").expect("parse");
        assert_eq!(member, Some("3"));
        assert_eq!(rest, vec!["2024-01-05", "Cash"]);
        assert!(take_option(&["--member"], "--member").is_err());
    }

    #[test]
    fn dash_means_no_text() {
        assert_eq!(optional_text(Some("-")), None);
        assert_eq!(optional_text(Some(" rent ")), Some("rent".to_string()));
    }
}
