// Single-row XLSX artifacts.

use std::path::Path;

use rust_xlsxwriter::Workbook;
use snafu::prelude::*;

use crate::intake::{BIntakeResult, WritingXlsxArtifactSnafu};

/// Worksheet name of the generated workbook.
const SHEET_NAME: &str = "Risposte";

/// Writes a header row plus one data row to a fresh workbook at `path`.
pub fn write_single_row(path: &Path, columns: &[(&str, &str)]) -> BIntakeResult<()> {
    let display = path.display().to_string();

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(SHEET_NAME)
        .context(WritingXlsxArtifactSnafu {
            path: display.clone(),
        })?;

    for (idx, (column, value)) in columns.iter().enumerate() {
        let col = idx as u16;
        worksheet
            .write_string(0, col, *column)
            .context(WritingXlsxArtifactSnafu {
                path: display.clone(),
            })?;
        worksheet
            .write_string(1, col, *value)
            .context(WritingXlsxArtifactSnafu {
                path: display.clone(),
            })?;
    }

    workbook.save(path).context(WritingXlsxArtifactSnafu {
        path: display.clone(),
    })?;
    Ok(())
}
