//! Decoding of command-line arguments and environment variables
//!
//! Arguments take one raw line each, environment variables take two (key,
//! then value). Enabled flags live in a separate boolean array with one flag
//! per argument or per variable, so it advances by `count` in both cases.

use super::cursor::{Cursor, count_for_scheme, take};
use super::nulls_to_newlines;
use crate::types::{CommandLineArgument, EnvironmentVariable};

/// Cursors into the raw line array and into one enabled-flags array
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Positions {
    pub lines: Cursor,
    pub enabled: Cursor,
}

/// Decodes the arguments declared for `index`.
///
/// Without `enabled_states` every argument is enabled and only the line
/// cursor moves.
pub fn command_line_arguments(
    raw: &[String],
    counts: &[usize],
    enabled_states: Option<&[bool]>,
    index: usize,
    positions: Positions,
) -> (Vec<CommandLineArgument>, Positions) {
    if raw.is_empty() {
        return (Vec::new(), positions);
    }

    let count = count_for_scheme(counts, index);
    if count == 0 {
        return (Vec::new(), positions);
    }

    let (lines, next_lines) = take(raw, positions.lines, count);
    let (enabled, next_enabled) = enabled_slice(enabled_states, positions.enabled, count);

    let arguments = lines
        .iter()
        .enumerate()
        .map(|(i, value)| {
            CommandLineArgument::new(nulls_to_newlines(value), is_enabled(enabled, i))
        })
        .collect();

    (
        arguments,
        Positions {
            lines: next_lines,
            enabled: next_enabled,
        },
    )
}

/// Decodes the environment variables declared for `index`.
pub fn environment_variables(
    raw: &[String],
    counts: &[usize],
    enabled_states: Option<&[bool]>,
    index: usize,
    positions: Positions,
) -> (Vec<EnvironmentVariable>, Positions) {
    if raw.is_empty() {
        return (Vec::new(), positions);
    }

    let count = count_for_scheme(counts, index);
    if count == 0 {
        return (Vec::new(), positions);
    }

    let (lines, next_lines) = take(raw, positions.lines, count * 2);
    let (enabled, next_enabled) = enabled_slice(enabled_states, positions.enabled, count);

    let variables = lines
        .chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| {
            EnvironmentVariable::new(
                nulls_to_newlines(&pair[0]),
                nulls_to_newlines(&pair[1]),
                is_enabled(enabled, i),
            )
        })
        .collect();

    (
        variables,
        Positions {
            lines: next_lines,
            enabled: next_enabled,
        },
    )
}

fn enabled_slice(
    enabled_states: Option<&[bool]>,
    cursor: Cursor,
    count: usize,
) -> (Option<&[bool]>, Cursor) {
    match enabled_states {
        Some(states) => {
            let (slice, next) = take(states, cursor, count);
            (Some(slice), next)
        }
        None => (None, cursor),
    }
}

fn is_enabled(enabled: Option<&[bool]>, i: usize) -> bool {
    enabled.is_none_or(|states| states[i])
}
