//! Line oriented text sources
//!
//! Argument, environment and execution action text is handed over in
//! auxiliary files, one raw value per line. Sources are read completely
//! before decoding starts.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Something that can produce every line of a text blob
pub trait LineSource {
    /// Human readable location, used in error messages
    fn description(&self) -> String;

    fn read_lines(&self) -> Result<Vec<String>>;
}

/// Lines of a file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLines {
    path: PathBuf,
}

impl FileLines {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LineSource for FileLines {
    fn description(&self) -> String {
        self.path.display().to_string()
    }

    fn read_lines(&self) -> Result<Vec<String>> {
        tracing::debug!("Reading lines from {:?}", self.path);
        let reader = BufReader::new(File::open(&self.path)?);
        let lines = reader.lines().collect::<std::io::Result<Vec<_>>>()?;
        tracing::debug!("Read {} lines from {:?}", lines.len(), self.path);
        Ok(lines)
    }
}

/// Fully read contents of a line source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lines {
    pub description: String,
    pub lines: Vec<String>,
}

impl Lines {
    pub fn read(source: &dyn LineSource) -> Result<Self> {
        Ok(Self {
            description: source.description(),
            lines: source.read_lines()?,
        })
    }

    pub fn in_memory(lines: Vec<String>) -> Self {
        Self {
            description: lines.description(),
            lines,
        }
    }
}

impl LineSource for Vec<String> {
    fn description(&self) -> String {
        "<in-memory lines>".to_string()
    }

    fn read_lines(&self) -> Result<Vec<String>> {
        Ok(self.clone())
    }
}
