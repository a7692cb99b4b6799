pub mod container;
pub mod date;
pub mod manifest;
mod util;
pub mod validate;

pub use container::{ContainerError, ResourceContainer, MANIFEST_FILE};
pub use date::{format_iso_date, parse_iso_date, DateError, ISO_DATE_FORMAT};
pub use manifest::{Checking, DublinCore, Language, Manifest, Project, Source};
pub use validate::{is_valid, validate, validate_manifest, ValidationIssue, ValidationReport};
