// Best-effort upload of stored artifacts to the external file store.

use std::path::Path;

use log::info;
use snafu::prelude::*;

use crate::intake::config_reader::ForwardingSettings;
use crate::intake::{
    BIntakeResult, ForwardingSnafu, IntakeError, OpeningArtifactSnafu,
};

/// Uploads one stored artifact to `{upload_url}/{artifact_name}`.
///
/// One attempt with the configured timeout; the caller decides what a
/// failure means. The artifact on disk is never touched.
pub fn upload_artifact(
    settings: &ForwardingSettings,
    path: &Path,
    artifact_name: &str,
) -> BIntakeResult<()> {
    let base_url = match settings.url() {
        Some(url) => url,
        None => return Err(Box::new(IntakeError::MissingUploadUrl {})),
    };
    let target = format!("{}/{}", base_url.trim_end_matches('/'), artifact_name);
    info!("upload_artifact: uploading {:?} to {:?}", artifact_name, target);

    let body = std::fs::read(path).context(OpeningArtifactSnafu {
        path: path.display().to_string(),
    })?;

    let client = reqwest::blocking::Client::builder()
        .timeout(settings.timeout())
        .build()
        .context(ForwardingSnafu {
            name: artifact_name,
        })?;
    let response = client
        .put(&target)
        .bearer_auth(settings.api_key())
        .body(body)
        .send()
        .context(ForwardingSnafu {
            name: artifact_name,
        })?;
    response.error_for_status().context(ForwardingSnafu {
        name: artifact_name,
    })?;

    info!("upload_artifact: uploaded {:?}", artifact_name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_upload_url_is_reported() {
        // No configuration and no environment fallback set in the test
        // runner: the settings resolve to no endpoint.
        let settings = ForwardingSettings {
            upload_url: None,
            api_key_env: None,
            timeout_seconds: Some(1),
        };
        if settings.url().is_some() {
            // Environment override present; nothing to assert here.
            return;
        }
        let res = upload_artifact(&settings, Path::new("missing.xlsx"), "missing.xlsx");
        assert!(matches!(*res.unwrap_err(), IntakeError::MissingUploadUrl {}));
    }

    #[test]
    fn unreadable_artifacts_are_reported_before_any_request() {
        let settings = ForwardingSettings {
            upload_url: Some("https://files.invalid/api/upload".to_string()),
            api_key_env: None,
            timeout_seconds: Some(1),
        };
        let res = upload_artifact(
            &settings,
            Path::new("does_not_exist.xlsx"),
            "does_not_exist.xlsx",
        );
        assert!(matches!(
            *res.unwrap_err(),
            IntakeError::OpeningArtifact { .. }
        ));
    }
}
