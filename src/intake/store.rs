use std::fs;
use std::path::PathBuf;

use chrono::Local;
use log::{debug, info};
use snafu::prelude::*;

use survey_record::{Record, ID_COLUMN};

use crate::intake::{store_csv, store_xlsx, BIntakeResult, CreatingArtifactDirSnafu};

/// Respondent name used when sanitization leaves nothing.
pub const FALLBACK_RESPONDENT: &str = "Utente";

/// On-disk encoding of a stored artifact.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ArtifactFormat {
    Xlsx,
    Csv,
}

impl ArtifactFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactFormat::Xlsx => "xlsx",
            ArtifactFormat::Csv => "csv",
        }
    }
}

/// Persists assembled records as per-respondent artifacts.
///
/// Every submission produces one new file; files are never mutated or
/// deleted here.
pub struct ResponseStore {
    dir: PathBuf,
    format: ArtifactFormat,
}

impl ResponseStore {
    pub fn new(dir: &str, format: ArtifactFormat) -> ResponseStore {
        ResponseStore {
            dir: PathBuf::from(dir),
            format,
        }
    }

    /// Writes one record as a single-row artifact and returns its file
    /// name. The transient identifier column is dropped from the stored
    /// columns.
    pub fn persist(&self, record: &Record, respondent_name: &str) -> BIntakeResult<String> {
        fs::create_dir_all(&self.dir).context(CreatingArtifactDirSnafu {
            path: self.dir.display().to_string(),
        })?;

        let timestamp = Local::now().format("%Y%m%d%H%M%S").to_string();
        let name = artifact_file_name(respondent_name, &timestamp, self.format);
        let path = self.artifact_path(&name);
        debug!("persist: artifact path {:?}", path);

        let columns: Vec<(&str, &str)> = record
            .iter()
            .filter(|(column, _)| column.as_str() != ID_COLUMN)
            .map(|(column, value)| (column.as_str(), value.as_str()))
            .collect();

        match self.format {
            ArtifactFormat::Xlsx => store_xlsx::write_single_row(&path, &columns)?,
            ArtifactFormat::Csv => store_csv::write_single_row(&path, &columns)?,
        }
        info!("persist: wrote artifact {:?} ({} columns)", name, columns.len());
        Ok(name)
    }

    pub fn artifact_path(&self, artifact_name: &str) -> PathBuf {
        self.dir.join(artifact_name)
    }
}

/// Reduces a free-text respondent name to a filesystem-safe stem.
///
/// Whitespace runs collapse to a single `_`; everything that is not
/// alphanumeric or `_` is dropped. An empty result falls back to a fixed
/// placeholder.
pub fn sanitize_respondent_name(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    let sanitized = kept.split_whitespace().collect::<Vec<_>>().join("_");
    if sanitized.is_empty() {
        FALLBACK_RESPONDENT.to_string()
    } else {
        sanitized
    }
}

/// `{sanitized name}_{timestamp}.{extension}`.
///
/// The timestamp has second granularity, so two submissions from the same
/// respondent within the same second collide. Accepted: the name is a
/// practical disambiguator, not a uniqueness guarantee.
pub fn artifact_file_name(respondent_name: &str, timestamp: &str, format: ArtifactFormat) -> String {
    format!(
        "{}_{}.{}",
        sanitize_respondent_name(respondent_name),
        timestamp,
        format.extension()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_alphanumerics_and_underscores() {
        assert_eq!(sanitize_respondent_name("Anna Résumé!"), "Anna_Résumé");
        assert_eq!(sanitize_respondent_name("mario_rossi"), "mario_rossi");
        assert_eq!(sanitize_respondent_name("  Anna   Bianchi  "), "Anna_Bianchi");
        assert_eq!(sanitize_respondent_name("O'Brien (ext.)"), "OBrien_ext");
    }

    #[test]
    fn sanitize_falls_back_on_empty_results() {
        assert_eq!(sanitize_respondent_name(""), FALLBACK_RESPONDENT);
        assert_eq!(sanitize_respondent_name("!!! ???"), FALLBACK_RESPONDENT);
        assert_eq!(sanitize_respondent_name("   "), FALLBACK_RESPONDENT);
    }

    #[test]
    fn artifact_names_are_deterministic_per_timestamp() {
        let first = artifact_file_name("Anna", "20260101120000", ArtifactFormat::Xlsx);
        let second = artifact_file_name("Anna", "20260101120000", ArtifactFormat::Xlsx);
        // Same respondent within the same second collides by design.
        assert_eq!(first, second);
        assert_eq!(first, "Anna_20260101120000.xlsx");

        let csv = artifact_file_name("", "20260101120000", ArtifactFormat::Csv);
        assert_eq!(csv, "Utente_20260101120000.csv");
    }
}
