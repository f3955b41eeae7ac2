use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};

use std::fs;
use std::io::Read;

use survey_record::{assemble_record, Submission};

use crate::args::Args;
use crate::intake::config_reader::{read_config, IntakeConfig};
use crate::intake::store::{ArtifactFormat, ResponseStore};

pub mod config_reader;
pub mod forwarding;
pub mod io_json;
pub mod io_urlencoded;
pub mod store;
pub mod store_csv;
pub mod store_xlsx;

#[derive(Debug, Snafu)]
pub enum IntakeError {
    #[snafu(display("Error reading submission body {path}"))]
    OpeningSubmission {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading configuration {path}"))]
    OpeningConfig {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing configuration {path}"))]
    ParsingConfig {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error parsing the submission body as JSON"))]
    ParsingSubmissionJson { source: serde_json::Error },
    #[snafu(display("The submission JSON is not an object"))]
    SubmissionNotObject {},
    #[snafu(display(
        "Field {field} holds a value that is neither a string nor a list of strings"
    ))]
    SubmissionFieldType { field: String },
    #[snafu(display("Input type not implemented {input_type}"))]
    UnknownInputType { input_type: String },
    #[snafu(display("Artifact format not implemented {format}"))]
    UnknownFormat { format: String },
    #[snafu(display("Error creating the artifact directory {path}"))]
    CreatingArtifactDir {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing artifact {path}"))]
    WritingXlsxArtifact {
        source: rust_xlsxwriter::XlsxError,
        path: String,
    },
    #[snafu(display("Error writing artifact {path}"))]
    WritingCsvArtifact { source: csv::Error, path: String },
    #[snafu(display("Error reading back artifact {path} for upload"))]
    OpeningArtifact {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Forwarding requested but no upload URL is configured"))]
    MissingUploadUrl {},
    #[snafu(display("Error uploading artifact {name}"))]
    Forwarding { source: reqwest::Error, name: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type IntakeResult<T> = Result<T, IntakeError>;
pub type BIntakeResult<T> = Result<T, Box<IntakeError>>;

/// The reported outcome of one processed submission.
#[derive(Debug, Clone)]
pub struct IntakeOutcome {
    /// File name of the stored artifact.
    pub artifact_name: String,
    /// `None` when forwarding was not requested.
    pub forwarded: Option<bool>,
}

/// Processes one captured submission end to end: decode, aggregate into a
/// record, persist the artifact, optionally forward it.
///
/// A forwarding failure is reported in the outcome, not as an error: the
/// artifact already stored is never rolled back.
pub fn run_intake(args: &Args) -> BIntakeResult<IntakeOutcome> {
    let config = match &args.config {
        Some(path) => read_config(path)?,
        None => IntakeConfig::default(),
    };
    debug!("run_intake: config: {:?}", config);

    let input_type = args.input_type.as_deref().unwrap_or("urlencoded");
    let submission = read_submission(&args.input, input_type)?;

    let record = assemble_record(&submission);

    let format = resolve_format(
        args.format
            .as_deref()
            .or(config.output.artifact_format.as_deref()),
    )?;
    let store = ResponseStore::new(config.output.dir(), format);
    let artifact_name = store.persist(&record, submission.first("nome"))?;
    info!("run_intake: stored artifact {:?}", artifact_name);

    let forwarded = if args.forward {
        let outcome = match forwarding::upload_artifact(
            &config.forwarding,
            &store.artifact_path(&artifact_name),
            &artifact_name,
        ) {
            Ok(()) => true,
            Err(e) => {
                warn!("run_intake: forwarding of {:?} failed: {}", artifact_name, e);
                false
            }
        };
        Some(outcome)
    } else {
        None
    };

    Ok(IntakeOutcome {
        artifact_name,
        forwarded,
    })
}

fn read_submission(path: &str, input_type: &str) -> BIntakeResult<Submission> {
    info!(
        "read_submission: reading {:?} as {:?}",
        path, input_type
    );
    let body = read_input(path)?;
    match input_type {
        "urlencoded" => io_urlencoded::read_urlencoded_submission(&body),
        "json" => io_json::read_json_submission(&body),
        x => Err(Box::new(IntakeError::UnknownInputType {
            input_type: x.to_string(),
        })),
    }
}

fn read_input(path: &str) -> BIntakeResult<String> {
    if path == "-" {
        let mut body = String::new();
        std::io::stdin()
            .read_to_string(&mut body)
            .context(OpeningSubmissionSnafu { path })?;
        Ok(body)
    } else {
        Ok(fs::read_to_string(path).context(OpeningSubmissionSnafu { path })?)
    }
}

fn resolve_format(requested: Option<&str>) -> BIntakeResult<ArtifactFormat> {
    match requested.unwrap_or("xlsx") {
        "xlsx" => Ok(ArtifactFormat::Xlsx),
        "csv" => Ok(ArtifactFormat::Csv),
        x => Err(Box::new(IntakeError::UnknownFormat {
            format: x.to_string(),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook, Reader, Xlsx};
    use std::path::PathBuf;

    fn temp_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("skillform_test_{}_{}", tag, std::process::id()))
    }

    #[test]
    fn urlencoded_submission_round_trips_through_an_xlsx_artifact() {
        let body = "nome=Anna+Bianchi&sviluppo=Firmware\
                    &linguaggi_firmware%5B%5D=C&linguaggi_firmware%5B%5D=C%2B%2B\
                    &tool_firmware%5B%5D=Make\
                    &durata_firmware%5B%5D=2&durata_firmware%5B%5D=1";
        let sub = io_urlencoded::read_urlencoded_submission(body).unwrap();
        let record = assemble_record(&sub);

        let dir = temp_dir("xlsx");
        let store = ResponseStore::new(dir.to_str().unwrap(), ArtifactFormat::Xlsx);
        let name = store.persist(&record, sub.first("nome")).unwrap();
        assert!(name.starts_with("Anna_Bianchi_"));
        assert!(name.ends_with(".xlsx"));

        let mut workbook: Xlsx<_> = open_workbook(store.artifact_path(&name)).unwrap();
        let range = workbook.worksheet_range_at(0).unwrap().unwrap();
        let mut rows = range.rows();
        let read_cell = |cell: &calamine::DataType| match cell {
            calamine::DataType::String(s) => s.clone(),
            _ => String::new(),
        };
        let header: Vec<String> = rows.next().unwrap().iter().map(read_cell).collect();
        let values: Vec<String> = rows.next().unwrap().iter().map(read_cell).collect();
        // Trailing empty cells may be trimmed from the range.
        let value_at = |column: &str| {
            let idx = header.iter().position(|h| h == column).unwrap();
            values.get(idx).cloned().unwrap_or_default()
        };

        assert!(!header.contains(&"ID".to_string()));
        assert_eq!(header[0], "Nome");
        assert_eq!(value_at("Nome"), "Anna Bianchi");
        assert_eq!(value_at("Aree progetti Sviluppo"), "Firmware");
        assert_eq!(value_at("Firmware"), "C | Make |  | 2 | \n\nC++ |  |  | 1 | ");

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn csv_artifact_has_a_header_and_one_data_row() {
        let sub = io_urlencoded::read_urlencoded_submission("nome=Luca").unwrap();
        let record = assemble_record(&sub);

        let dir = temp_dir("csv");
        let store = ResponseStore::new(dir.to_str().unwrap(), ArtifactFormat::Csv);
        let name = store.persist(&record, "Luca").unwrap();
        assert!(name.ends_with(".csv"));

        let mut reader = csv::Reader::from_path(store.artifact_path(&name)).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().next(), Some("Nome"));
        assert!(!headers.iter().any(|h| h == "ID"));
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), headers.len());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn unknown_input_types_are_rejected() {
        let dir = temp_dir("input_type");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("body.txt");
        fs::write(&path, "nome=X").unwrap();
        let res = read_submission(path.to_str().unwrap(), "multipart");
        assert!(matches!(
            *res.unwrap_err(),
            IntakeError::UnknownInputType { .. }
        ));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn unknown_formats_are_rejected() {
        assert!(resolve_format(Some("xlsx")).is_ok());
        assert!(resolve_format(None).is_ok());
        let res = resolve_format(Some("parquet"));
        assert!(matches!(*res.unwrap_err(), IntakeError::UnknownFormat { .. }));
    }
}
