// Single-row CSV artifacts.

use std::path::Path;

use snafu::prelude::*;

use crate::intake::{BIntakeResult, WritingCsvArtifactSnafu};

/// Writes a header record plus one data record to `path`.
pub fn write_single_row(path: &Path, columns: &[(&str, &str)]) -> BIntakeResult<()> {
    let display = path.display().to_string();

    let mut writer = csv::Writer::from_path(path).context(WritingCsvArtifactSnafu {
        path: display.clone(),
    })?;
    writer
        .write_record(columns.iter().map(|(column, _)| *column))
        .context(WritingCsvArtifactSnafu {
            path: display.clone(),
        })?;
    writer
        .write_record(columns.iter().map(|(_, value)| *value))
        .context(WritingCsvArtifactSnafu {
            path: display.clone(),
        })?;
    writer
        .flush()
        .map_err(csv::Error::from)
        .context(WritingCsvArtifactSnafu {
            path: display.clone(),
        })?;
    Ok(())
}
