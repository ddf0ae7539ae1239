//! Document sources: plain-text files and in-memory text.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::traits::DocumentSource;

/// Reads a text file, falling back to lossy UTF-8 decoding for invalid bytes.
#[derive(Debug, Clone)]
pub struct TextFileSource {
    path: PathBuf,
    name: String,
}

impl TextFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = file_name_of(&path);
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentSource for TextFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_text(&self) -> Result<String> {
        match fs::read_to_string(self.path()) {
            Ok(content) => Ok(content),
            Err(_) => {
                let bytes = fs::read(self.path()).with_context(|| format!("cannot read {}", self.path().display()))?;
                Ok(String::from_utf8_lossy(&bytes).to_string())
            }
        }
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Text that is already in memory, e.g. extracted by an upstream service.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    name: String,
    text: String,
}

impl InMemorySource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self { name: name.into(), text: text.into() }
    }
}

impl DocumentSource for InMemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_text(&self) -> Result<String> {
        Ok(self.text.clone())
    }
}
