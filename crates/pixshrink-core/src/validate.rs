//! Input validation for candidate files.

use thiserror::Error;

use crate::presenter::Presenter;
use crate::{MediaType, SourceFile};

/// Shown when a file is missing or not a JPEG/PNG ("Please upload a PNG or JPG image!").
pub const INVALID_FILE_MESSAGE: &str = "请上传PNG或JPG格式的图片！";

/// Advisory `accept` attribute for the file picker. [`check`] is authoritative.
pub const ACCEPT_LIST: &str = "image/jpeg,image/png";

/// Why a candidate was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No file was provided")]
    Missing,

    #[error("Unsupported media type: {0:?}")]
    UnsupportedType(String),
}

impl ValidationError {
    /// Message to surface to the user. Both variants share it.
    pub fn user_message(&self) -> &'static str {
        INVALID_FILE_MESSAGE
    }
}

/// Check a candidate and return its media type.
pub fn check(candidate: Option<&SourceFile>) -> Result<MediaType, ValidationError> {
    let file = candidate.ok_or(ValidationError::Missing)?;
    file.media_type()
        .ok_or_else(|| ValidationError::UnsupportedType(file.declared_type().to_string()))
}

/// Accept or reject a candidate, alerting the user on rejection.
///
/// Never fails; callers branch on the boolean.
pub fn validate(candidate: Option<&SourceFile>, presenter: &mut impl Presenter) -> bool {
    accept(candidate, presenter).is_some()
}

/// [`check`], alerting on rejection.
pub(crate) fn accept(
    candidate: Option<&SourceFile>,
    presenter: &mut impl Presenter,
) -> Option<MediaType> {
    match check(candidate) {
        Ok(media_type) => Some(media_type),
        Err(err) => {
            tracing::warn!(error = %err, "rejected input file");
            presenter.alert(err.user_message());
            None
        }
    }
}
