use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::file_format::{FileExtensionError, FileFormat};

#[derive(Debug, thiserror::Error)]
pub enum SerdeFormatError {
    #[error("YAML serialization failed")]
    Yaml(#[from] serde_yml::Error),
    #[error("JSON serialization failed")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Extension(#[from] FileExtensionError),
    #[error("Failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type SerdeFormatResult<T> = Result<T, SerdeFormatError>;

pub fn serialize<T: Serialize>(value: &T, format: FileFormat) -> SerdeFormatResult<String> {
    let text = match format {
        FileFormat::Yaml => serde_yml::to_string(value)?,
        FileFormat::Json => serde_json::to_string_pretty(value)?,
    };
    Ok(normalize_line_endings(&text))
}

pub fn deserialize<T: DeserializeOwned>(
    serialized: &str,
    format: FileFormat,
) -> SerdeFormatResult<T> {
    match format {
        FileFormat::Yaml => Ok(serde_yml::from_str(serialized)?),
        FileFormat::Json => Ok(serde_json::from_str(serialized)?),
    }
}

/// Reads a value from a YAML or JSON file, picking the format by extension.
pub fn read_file<T: DeserializeOwned>(path: &Path) -> SerdeFormatResult<T> {
    let format = FileFormat::from_path(path)?;
    let text = std::fs::read_to_string(path).map_err(|source| SerdeFormatError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    deserialize(&text, format)
}

pub fn write_file<T: Serialize>(value: &T, path: &Path) -> SerdeFormatResult<()> {
    let format = FileFormat::from_path(path)?;
    let text = serialize(value, format)?;
    std::fs::write(path, text).map_err(|source| SerdeFormatError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn normalize_line_endings(text: &str) -> String {
    let mut out = text.replace("\r\n", "\n");
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}
