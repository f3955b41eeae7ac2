mod config;
use log::{debug, info, warn};

use std::sync::atomic::{AtomicU64, Ordering};

pub use crate::config::*;

/// The column holding the transient submission identifier.
pub const ID_COLUMN: &str = "ID";

static SUBMISSION_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Returns the next transient submission identifier.
///
/// The counter lives for the process only and restarts at 1 after a
/// restart. It is a cross-reference for logs and is stripped before the
/// record reaches the stored artifact, so it carries no uniqueness
/// guarantee across restarts.
pub fn next_submission_id() -> u64 {
    SUBMISSION_COUNTER.fetch_add(1, Ordering::Relaxed) + 1
}

/// Zips parallel attribute lists into serialized experience entries.
///
/// The repeated entry rows of the form arrive as independently-sized field
/// lists that can only be re-correlated by position. The entry count is the
/// maximum list length; a list shorter than that contributes the empty
/// string at the missing indexes. Entries keep the submission (index)
/// order.
pub fn zip_experience_entries(lists: &[&[String]]) -> Vec<String> {
    let max_len = lists.iter().map(|list| list.len()).max().unwrap_or(0);
    let mut entries: Vec<String> = Vec::with_capacity(max_len);
    for idx in 0..max_len {
        let values: Vec<&str> = lists
            .iter()
            .map(|list| list.get(idx).map(|s| s.as_str()).unwrap_or(""))
            .collect();
        entries.push(values.join(ENTRY_VALUE_SEPARATOR));
    }
    entries
}

/// Fetches the parallel attribute lists for one area of one section, in the
/// section's attribute order.
///
/// Missing fields yield empty lists; values are taken as-is.
pub fn area_field_lists<'a>(
    submission: &'a Submission,
    section: &SectionSpec,
    area: &str,
) -> Vec<&'a [String]> {
    section
        .attributes
        .iter()
        .map(|attribute| submission.list(&section.attribute_field(attribute, area)))
        .collect()
}

/// Processes one section into the shared record: the selected-areas summary
/// column followed by one column per area, in the fixed schema order.
///
/// Areas the respondent did not select are skipped entirely (no extraction)
/// and contribute an empty column, even when stray attribute fields for
/// them are present in the submission.
pub fn aggregate_section(submission: &Submission, section: &SectionSpec, record: &mut Record) {
    let selected = submission.list(section.select_field);
    record.insert(section.summary_column(), selected.join(LIST_SEPARATOR));

    for unknown in selected
        .iter()
        .filter(|s| !section.areas.iter().any(|area| *area == s.as_str()))
    {
        warn!(
            "aggregate_section: unknown area {:?} selected in section {:?}",
            unknown, section.name
        );
    }

    for area in section.areas {
        if !selected.iter().any(|s| s.as_str() == *area) {
            record.insert((*area).to_string(), String::new());
            continue;
        }
        let lists = area_field_lists(submission, section, area);
        let entries = zip_experience_entries(&lists);
        debug!(
            "aggregate_section: section {:?} area {:?}: {} entries",
            section.name,
            area,
            entries.len()
        );
        record.insert((*area).to_string(), entries.join(ENTRY_SEPARATOR));
    }
}

/// Assembles the full record for one submission: the scalar columns first,
/// then the seven sections in their fixed order.
///
/// The key set is identical for every submission. Absent fields produce
/// empty values, never missing columns.
pub fn assemble_record(submission: &Submission) -> Record {
    let id = next_submission_id();
    info!(
        "assemble_record: submission {} from {:?}",
        id,
        submission.first("nome")
    );

    let mut record = Record::new();
    record.insert(ID_COLUMN.to_string(), id.to_string());
    for scalar in SCALAR_COLUMNS {
        let value = if scalar.multi {
            submission.list(scalar.field).join(LIST_SEPARATOR)
        } else {
            submission.first(scalar.field).to_string()
        };
        record.insert(scalar.column.to_string(), value);
    }

    for section in SECTIONS {
        aggregate_section(submission, section, &mut record);
    }
    debug!("assemble_record: {} columns", record.len());
    record
}
