//! Structural checks run before a container is persisted.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::container::ResourceContainer;
use crate::date::parse_iso_date;
use crate::manifest::Manifest;

static IDENTIFIER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9_-]*$").expect("identifier pattern"));
static LANGUAGE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9-]*$").expect("language pattern"));

const DIRECTIONS: &[&str] = &["ltr", "rtl"];
const CHECKING_LEVELS: &[&str] = &["1", "2", "3"];

/// A single rule violation, keyed by the manifest field it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ValidationIssue::new(field, message));
    }

    fn require(&mut self, field: &str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.push(field, "must not be empty");
            false
        } else {
            true
        }
    }
}

/// Validates the manifest of `container`, collecting every issue found.
pub fn validate(container: &ResourceContainer) -> ValidationReport {
    validate_manifest(&container.manifest)
}

/// Returns `true` when the container's manifest passes every rule.
pub fn is_valid(container: &ResourceContainer) -> bool {
    validate(container).is_valid()
}

pub fn validate_manifest(manifest: &Manifest) -> ValidationReport {
    let mut report = ValidationReport::default();
    let dc = &manifest.dublin_core;

    report.require("dublin_core.conformsto", &dc.conformsto);
    report.require("dublin_core.format", &dc.format);
    report.require("dublin_core.title", &dc.title);
    report.require("dublin_core.type", &dc.kind);
    report.require("dublin_core.version", &dc.version);
    if report.require("dublin_core.identifier", &dc.identifier)
        && !IDENTIFIER_PATTERN.is_match(&dc.identifier)
    {
        report.push(
            "dublin_core.identifier",
            "must be lowercase letters, digits, '-' or '_'",
        );
    }

    if report.require("dublin_core.language.identifier", &dc.language.identifier)
        && !LANGUAGE_PATTERN.is_match(&dc.language.identifier)
    {
        report.push(
            "dublin_core.language.identifier",
            "must be a language code such as 'en' or 'es-419'",
        );
    }
    report.require("dublin_core.language.title", &dc.language.title);
    if !DIRECTIONS.contains(&dc.language.direction.as_str()) {
        report.push("dublin_core.language.direction", "must be 'ltr' or 'rtl'");
    }

    let issued = check_date(&mut report, "dublin_core.issued", &dc.issued);
    let modified = check_date(&mut report, "dublin_core.modified", &dc.modified);
    if let (Some(issued), Some(modified)) = (issued, modified) {
        if modified < issued {
            report.push("dublin_core.modified", "must not be earlier than issued");
        }
    }

    for (index, source) in dc.source.iter().enumerate() {
        let prefix = format!("dublin_core.source[{index}]");
        report.require(&format!("{prefix}.identifier"), &source.identifier);
        report.require(&format!("{prefix}.language"), &source.language);
        report.require(&format!("{prefix}.version"), &source.version);
    }

    let mut seen = HashSet::new();
    for (index, project) in manifest.projects.iter().enumerate() {
        let prefix = format!("projects[{index}]");
        if report.require(&format!("{prefix}.identifier"), &project.identifier)
            && !seen.insert(project.identifier.as_str())
        {
            report.push(
                format!("{prefix}.identifier"),
                format!("duplicate project identifier '{}'", project.identifier),
            );
        }
        report.require(&format!("{prefix}.path"), &project.path);
        if project.sort < 0 {
            report.push(format!("{prefix}.sort"), "must not be negative");
        }
    }

    let level = manifest.checking.checking_level.trim();
    if !level.is_empty() && !CHECKING_LEVELS.contains(&level) {
        report.push("checking.checking_level", "must be 1, 2 or 3");
    }

    report
}

/// Records an issue unless `value` is a real calendar date in canonical `YYYY-MM-DD` form.
fn check_date(report: &mut ValidationReport, field: &str, value: &str) -> Option<NaiveDate> {
    let parsed = parse_iso_date(value).ok();
    if parsed.is_none() {
        report.push(field, "must be a calendar date in YYYY-MM-DD form");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{Language, Project, Source};

    fn valid_manifest() -> Manifest {
        let mut manifest = Manifest::default();
        let dc = &mut manifest.dublin_core;
        dc.conformsto = "rc0.2".into();
        dc.format = "text/usfm".into();
        dc.identifier = "ulb".into();
        dc.title = "Unlocked Literal Bible".into();
        dc.kind = "bundle".into();
        dc.version = "1".into();
        dc.issued = "2023-05-01".into();
        dc.modified = "2023-06-01".into();
        dc.language = Language {
            direction: "ltr".into(),
            identifier: "en".into(),
            title: "English".into(),
        };
        dc.source.push(Source::new("ulb", "en", "1"));
        manifest.projects.push(Project {
            identifier: "gen".into(),
            path: "./01-GEN.usfm".into(),
            sort: 1,
            ..Project::default()
        });
        manifest.checking.checking_level = "3".into();
        manifest
    }

    #[test]
    fn complete_manifest_passes() {
        let report = validate_manifest(&valid_manifest());
        assert!(report.is_valid(), "unexpected issues: {:?}", report.issues);
    }

    #[test]
    fn default_manifest_is_rejected() {
        let report = validate_manifest(&Manifest::default());
        assert!(!report.is_valid());
        assert!(report
            .issues
            .iter()
            .any(|issue| issue.field == "dublin_core.conformsto"));
    }

    #[test]
    fn impossible_dates_are_rejected() {
        let mut manifest = valid_manifest();
        manifest.dublin_core.issued = "2023-02-30".into();
        let report = validate_manifest(&manifest);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].field, "dublin_core.issued");
    }

    #[test]
    fn modified_before_issued_is_rejected() {
        let mut manifest = valid_manifest();
        manifest.dublin_core.modified = "2022-12-31".into();
        let report = validate_manifest(&manifest);
        assert_eq!(report.issues[0].field, "dublin_core.modified");
    }

    #[test]
    fn duplicate_projects_and_bad_level_are_reported() {
        let mut manifest = valid_manifest();
        let duplicate = manifest.projects[0].clone();
        manifest.projects.push(duplicate);
        manifest.checking.checking_level = "5".into();
        let fields: Vec<_> = validate_manifest(&manifest)
            .issues
            .into_iter()
            .map(|issue| issue.field)
            .collect();
        assert_eq!(
            fields,
            vec!["projects[1].identifier", "checking.checking_level"]
        );
    }

    #[test]
    fn unpadded_date_is_rejected() {
        let mut manifest = valid_manifest();
        manifest.dublin_core.modified = "2023-5-1".into();
        let report = validate_manifest(&manifest);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].field, "dublin_core.modified");
    }

    #[test]
    fn leap_day_is_accepted() {
        let mut manifest = valid_manifest();
        manifest.dublin_core.issued = "2024-02-29".into();
        manifest.dublin_core.modified = "2024-02-29".into();
        assert!(validate_manifest(&manifest).is_valid());
    }
}
