//! Decoding of count-encoded flat arrays into per-scheme lists

pub mod args_env;
pub mod cursor;
pub mod lines;

pub use args_env::{Positions, command_line_arguments, environment_variables};
pub use cursor::{Cursor, count_for_scheme, slice_for_scheme, take};
pub use lines::{FileLines, LineSource, Lines};

/// Reverses the transport encoding of embedded newlines
pub fn nulls_to_newlines(value: &str) -> String {
    value.replace('\0', "\n")
}
