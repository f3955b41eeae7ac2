// Decoding of JSON-captured submission bodies.
//
// The JSON mirrors the form multimap: a top-level object whose values are
// either a single string or a list of strings.

use serde_json::Value as JSValue;

use snafu::prelude::*;
use survey_record::Submission;

use crate::intake::{BIntakeResult, IntakeError, ParsingSubmissionJsonSnafu};

pub fn read_json_submission(body: &str) -> BIntakeResult<Submission> {
    let js: JSValue = serde_json::from_str(body).context(ParsingSubmissionJsonSnafu {})?;
    let obj = match js.as_object() {
        Some(obj) => obj,
        None => return Err(Box::new(IntakeError::SubmissionNotObject {})),
    };

    let mut submission = Submission::new();
    for (name, value) in obj {
        match value {
            JSValue::String(s) => submission.push_value(name, s),
            JSValue::Array(items) => {
                for item in items {
                    match item.as_str() {
                        Some(s) => submission.push_value(name, s),
                        None => {
                            return Err(Box::new(IntakeError::SubmissionFieldType {
                                field: name.clone(),
                            }));
                        }
                    }
                }
            }
            _ => {
                return Err(Box::new(IntakeError::SubmissionFieldType {
                    field: name.clone(),
                }));
            }
        }
    }
    Ok(submission)
}
