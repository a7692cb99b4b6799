use log::warn;
use rceditor_container::{ResourceContainer, ValidationReport};
use thiserror::Error;

use crate::backend::ContainerBackend;
use crate::notification::SAVE_REJECTED_MESSAGE;
use crate::view_state::{FlushError, ManifestViewState};

/// 儲存前被擋下的原因。 / Why a save was stopped before any I/O.
///
/// Both variants render the same user-facing message; the detail is kept for logs.
#[derive(Debug, Error)]
pub enum SaveRejection {
    #[error("{}", SAVE_REJECTED_MESSAGE)]
    Flush(#[source] FlushError),
    #[error("{}", SAVE_REJECTED_MESSAGE)]
    Invalid(ValidationReport),
}

/// Flushes `view_state` into a staged copy of `container` and asks the backend validator
/// whether it may be persisted. `container` itself is never modified.
pub fn stage_for_save(
    backend: &dyn ContainerBackend,
    view_state: &ManifestViewState,
    container: &ResourceContainer,
) -> Result<ResourceContainer, SaveRejection> {
    let mut staged = container.clone();
    if let Err(err) = view_state.flush(&mut staged.manifest) {
        warn!(
            "event=save_rejected module=validation reason=flush path={} error={}",
            container.dir().display(),
            err
        );
        return Err(SaveRejection::Flush(err));
    }

    let report = backend.validate(&staged);
    if !report.is_valid() {
        let summary = report
            .issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        warn!(
            "event=save_rejected module=validation reason=invalid path={} issues={}",
            container.dir().display(),
            summary
        );
        return Err(SaveRejection::Invalid(report));
    }
    Ok(staged)
}
