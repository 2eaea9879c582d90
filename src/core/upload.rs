//! Multipart upload and the dashboard flash message it produces.

use leptos::logging::warn;

use crate::core::api::{ApiClient, UploadOutcome};
use crate::core::error::{FormError, ValidationError};
use crate::core::transport::{Transport, UploadFile};

/// Banner shown on the dashboard after an upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadFlash {
    Complete,
    Partial,
}

impl UploadFlash {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Complete => "Files uploaded successfully!",
            Self::Partial => "Some files were uploaded successfully",
        }
    }
}

impl From<&UploadOutcome> for UploadFlash {
    fn from(outcome: &UploadOutcome) -> Self {
        match outcome {
            UploadOutcome::Complete => Self::Complete,
            UploadOutcome::Partial(_) => Self::Partial,
        }
    }
}

/// Upload `files` under the `files[]` field.
pub async fn upload_files<T: Transport>(
    api: &ApiClient<T>,
    files: Vec<UploadFile>,
) -> Result<UploadFlash, FormError> {
    if files.is_empty() {
        return Err(ValidationError::NoFileSelected.into());
    }
    let outcome = api.upload(files).await?;
    if let UploadOutcome::Partial(errors) = &outcome {
        for error in errors {
            warn!("[upload] {}", error);
        }
    }
    Ok(UploadFlash::from(&outcome))
}
