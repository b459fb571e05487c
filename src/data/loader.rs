//! CSV Data Loader Module
//! Reads the score export into a Polars DataFrame.

use crate::error::{DashboardError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a delimited UTF-8 file whose first row is the header.
    ///
    /// Every column is read as text so that numeric coercion stays under the
    /// cleaner's control.
    pub fn load_csv(path: &Path, separator: u8) -> Result<DataFrame> {
        Self::check_readable(path)?;

        let df = LazyCsvReader::new(path)
            .with_separator(separator)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;

        log::info!(
            "Loaded {} rows, {} columns from {}",
            df.height(),
            df.width(),
            path.display()
        );
        Ok(df)
    }

    /// Fail early with a file access error instead of a reader error.
    fn check_readable(path: &Path) -> Result<()> {
        let access_error = |source| DashboardError::FileAccess {
            path: path.to_path_buf(),
            source,
        };

        let metadata = std::fs::metadata(path).map_err(access_error)?;
        if metadata.is_dir() {
            return Err(access_error(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "path is a directory",
            )));
        }
        File::open(path).map(drop).map_err(access_error)
    }

    /// Get list of column names from a DataFrame.
    pub fn get_columns(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}
