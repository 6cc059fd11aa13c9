//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;

use lendops_api::{DateRange, PageRequest};

use crate::cli::{DateRangeArgs, PageArgs};
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to ask on, refuses instead of hanging.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read and deserialize a JSON file for `--from-file` flags.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("{}: {e}", path.display()),
    })
}

pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("expected YYYY-MM-DD, got '{raw}'"),
    })
}

pub fn parse_opt_date(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, CliError> {
    raw.map(|r| parse_date(field, r)).transpose()
}

/// Parse a positive money amount.
pub fn parse_amount(field: &str, raw: &str) -> Result<Decimal, CliError> {
    let amount = Decimal::from_str(raw.trim()).map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("'{raw}' is not a number"),
    })?;
    if amount <= Decimal::ZERO {
        return Err(CliError::Validation {
            field: field.into(),
            reason: "must be greater than zero".into(),
        });
    }
    Ok(amount)
}

pub fn parse_opt_amount(field: &str, raw: Option<&str>) -> Result<Option<Decimal>, CliError> {
    raw.map(|r| parse_amount(field, r)).transpose()
}

pub fn page_request(args: PageArgs) -> PageRequest {
    PageRequest::new(args.page, args.size)
}

pub fn date_range(args: &DateRangeArgs) -> Result<DateRange, CliError> {
    let range = DateRange {
        from: parse_opt_date("from", args.from.as_deref())?,
        to: parse_opt_date("to", args.to.as_deref())?,
    };
    match (range.from, range.to) {
        (Some(from), Some(to)) if from > to => Err(CliError::Validation {
            field: "from".into(),
            reason: format!("{from} is after {to}"),
        }),
        _ => Ok(range),
    }
}
