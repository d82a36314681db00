//! Count-encoded command-line input
//!
//! Every "list of things spread over schemes" category arrives as a counts
//! array plus a flat values array. The structs here are declared with
//! `clap::Args` so the CLI can flatten them, and each one validates its own
//! arrays before anything is sliced.

pub mod custom_schemes;
pub mod execution_actions;
pub mod target_args_env;

pub use custom_schemes::CustomSchemesArguments;
pub use execution_actions::ExecutionActionsArguments;
pub use target_args_env::{ArgsAndEnvArguments, TargetArgsAndEnv};

use crate::error::{Error, Result};
use crate::types::TargetId;

/// `"1"` is true, anything else is false
pub fn parse_flag(value: &str) -> std::result::Result<bool, String> {
    Ok(value == "1")
}

/// Empty string means "no value"
pub fn parse_optional_string(value: &str) -> std::result::Result<Option<String>, String> {
    Ok((!value.is_empty()).then(|| value.to_string()))
}

pub fn parse_optional_target_id(value: &str) -> std::result::Result<Option<TargetId>, String> {
    Ok((!value.is_empty()).then(|| TargetId::from(value)))
}

pub fn parse_optional_order(value: &str) -> std::result::Result<Option<i64>, String> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|e| format!("invalid order '{value}': {e}"))
}

/// Adds up a counts array, rejecting totals that do not fit in `usize`
pub(crate) fn sum(counts_name: &str, counts: &[usize]) -> Result<usize> {
    counts
        .iter()
        .try_fold(0usize, |total, &count| total.checked_add(count))
        .ok_or_else(|| too_large(counts_name))
}

/// Lines taken by `arg_count` arguments and `env_count` (key, value) pairs
pub(crate) fn args_env_line_count(
    arg_count: usize,
    env_count: usize,
    counts_name: &str,
) -> Result<usize> {
    env_count
        .checked_mul(2)
        .and_then(|env_lines| env_lines.checked_add(arg_count))
        .ok_or_else(|| too_large(counts_name))
}

fn too_large(counts_name: &str) -> Error {
    Error::Validation(format!(
        "The sum of <{counts_name}> is too large to describe any number of elements."
    ))
}

/// A counts array is either unused (sums to zero) or has one entry per owner
pub(crate) fn check_counts_len(
    counts_name: &str,
    counts: &[usize],
    owner_name: &str,
    owner_len: usize,
) -> Result<()> {
    if counts.iter().all(|&count| count == 0) || counts.len() == owner_len {
        return Ok(());
    }
    Err(Error::Validation(format!(
        "<{counts_name}> ({} elements) must have exactly as many elements as <{owner_name}> ({owner_len} elements).",
        counts.len()
    )))
}

pub(crate) fn check_counts_sum(
    counts_name: &str,
    counts: &[usize],
    values_name: &str,
    values_len: usize,
) -> Result<()> {
    let counts_sum = sum(counts_name, counts)?;
    if counts_sum == values_len {
        return Ok(());
    }
    Err(Error::Validation(format!(
        "The sum of <{counts_name}> ({counts_sum}) must equal the number of <{values_name}> elements ({values_len})."
    )))
}

pub(crate) fn check_enabled_states(
    states_name: &str,
    states_len: usize,
    counts_name: &str,
    counts: &[usize],
) -> Result<()> {
    let counts_sum = sum(counts_name, counts)?;
    if counts_sum == states_len {
        return Ok(());
    }
    Err(Error::Validation(format!(
        "The number of <{states_name}> elements ({states_len}) must equal the sum of <{counts_name}> ({counts_sum})."
    )))
}

pub(crate) fn check_len(name: &str, len: usize, owner_name: &str, owner_len: usize) -> Result<()> {
    if len == owner_len {
        return Ok(());
    }
    Err(Error::Validation(format!(
        "<{name}> ({len} elements) must have exactly as many elements as <{owner_name}> ({owner_len} elements)."
    )))
}
