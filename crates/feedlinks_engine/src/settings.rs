use std::path::{Path, PathBuf};

use feedlinks_core::JsonStyle;

pub const INPUT_FILENAME: &str = "input.html";
pub const OUTPUT_FILENAME: &str = "output.json";

/// Where one extraction run reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub working_dir: PathBuf,
    pub input_filename: String,
    pub output_filename: String,
    pub style: JsonStyle,
}

impl RunSettings {
    /// Default file names inside `dir`, compact output.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            working_dir: dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn with_style(mut self, style: JsonStyle) -> Self {
        self.style = style;
        self
    }

    pub fn input_path(&self) -> PathBuf {
        self.working_dir.join(&self.input_filename)
    }
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("."),
            input_filename: INPUT_FILENAME.to_string(),
            output_filename: OUTPUT_FILENAME.to_string(),
            style: JsonStyle::Compact,
        }
    }
}
