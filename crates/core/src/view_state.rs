use chrono::{Local, NaiveDate};
use rceditor_container::{format_iso_date, parse_iso_date, DateError, Manifest};
use thiserror::Error;
use uuid::Uuid;

use crate::item::TextItem;
use crate::rows::{ProjectRow, RowConversionError, SourceRow};

pub use rceditor_container::ISO_DATE_FORMAT;

/// 將 manifest 載入畫面狀態時的錯誤。 / Raised when a manifest cannot populate the view-state.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid {field} date '{value}': {source}")]
    Date {
        field: &'static str,
        value: String,
        #[source]
        source: DateError,
    },
}

/// 將畫面狀態寫回 manifest 時的錯誤。 / Raised when the view-state cannot be written back.
#[derive(Debug, Error)]
pub enum FlushError {
    #[error(transparent)]
    Row(#[from] RowConversionError),
}

/// In-memory mirror of every editable manifest field.
///
/// Scalars and collections are plain fields so the form can bind to them directly.
/// Programmatic mutations (`load`, `clear`) bump [`ManifestViewState::revision`], which the
/// view uses to discard widget state that belongs to the previous contents.
#[derive(Debug, Clone)]
pub struct ManifestViewState {
    pub conforms_to: String,
    pub creator: String,
    pub description: String,
    pub format: String,
    pub identifier: String,
    pub issued: NaiveDate,
    pub modified: NaiveDate,
    pub language_direction: String,
    pub language_identifier: String,
    pub language_title: String,
    pub publisher: String,
    pub rights: String,
    pub subject: String,
    pub title: String,
    pub kind: String,
    pub version: String,
    pub checking_level: String,
    pub contributors: Vec<TextItem>,
    pub relations: Vec<TextItem>,
    pub sources: Vec<SourceRow>,
    pub checking_entities: Vec<TextItem>,
    pub projects: Vec<ProjectRow>,
    revision: u64,
}

impl Default for ManifestViewState {
    fn default() -> Self {
        let today = today();
        Self {
            conforms_to: String::new(),
            creator: String::new(),
            description: String::new(),
            format: String::new(),
            identifier: String::new(),
            issued: today,
            modified: today,
            language_direction: String::new(),
            language_identifier: String::new(),
            language_title: String::new(),
            publisher: String::new(),
            rights: String::new(),
            subject: String::new(),
            title: String::new(),
            kind: String::new(),
            version: String::new(),
            checking_level: String::new(),
            contributors: Vec::new(),
            relations: Vec::new(),
            sources: Vec::new(),
            checking_entities: Vec::new(),
            projects: Vec::new(),
            revision: 0,
        }
    }
}

impl ManifestViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Incremented after every `load` and `clear`.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// 重設所有欄位；日期設為今天。 / Resets every field; both dates become today.
    pub fn clear(&mut self) {
        let today = today();
        for field in [
            &mut self.conforms_to,
            &mut self.creator,
            &mut self.description,
            &mut self.format,
            &mut self.identifier,
            &mut self.language_direction,
            &mut self.language_identifier,
            &mut self.language_title,
            &mut self.publisher,
            &mut self.rights,
            &mut self.subject,
            &mut self.title,
            &mut self.kind,
            &mut self.version,
            &mut self.checking_level,
        ] {
            field.clear();
        }
        self.issued = today;
        self.modified = today;
        self.contributors.clear();
        self.relations.clear();
        self.sources.clear();
        self.checking_entities.clear();
        self.projects.clear();
        self.notify();
    }

    /// 從 manifest 複製欄位；清單為附加而非取代。 / Copies every field from `manifest`.
    /// Collections are appended to, so callers clear first when switching containers.
    ///
    /// Both dates are parsed before anything is assigned; a malformed date leaves the
    /// state untouched.
    pub fn load(&mut self, manifest: &Manifest) -> Result<(), LoadError> {
        let dc = &manifest.dublin_core;
        let issued = parse_date("issued", &dc.issued)?;
        let modified = parse_date("modified", &dc.modified)?;

        self.conforms_to = dc.conformsto.clone();
        self.creator = dc.creator.clone();
        self.description = dc.description.clone();
        self.format = dc.format.clone();
        self.identifier = dc.identifier.clone();
        self.issued = issued;
        self.modified = modified;
        self.language_direction = dc.language.direction.clone();
        self.language_identifier = dc.language.identifier.clone();
        self.language_title = dc.language.title.clone();
        self.publisher = dc.publisher.clone();
        self.rights = dc.rights.clone();
        self.subject = dc.subject.clone();
        self.title = dc.title.clone();
        self.kind = dc.kind.clone();
        self.version = dc.version.clone();
        self.checking_level = manifest.checking.checking_level.clone();

        self.contributors
            .extend(dc.contributor.iter().map(|text| TextItem::new(text.as_str())));
        self.relations
            .extend(dc.relation.iter().map(|text| TextItem::new(text.as_str())));
        self.sources.extend(dc.source.iter().map(SourceRow::from));
        self.checking_entities.extend(
            manifest
                .checking
                .checking_entity
                .iter()
                .map(|text| TextItem::new(text.as_str())),
        );
        self.projects
            .extend(manifest.projects.iter().map(ProjectRow::from));
        self.notify();
        Ok(())
    }

    /// 將目前狀態寫入 manifest；清單整批取代。 / Writes the state into `manifest`,
    /// replacing each list wholesale. Rows are converted before anything is written, so a
    /// failed conversion leaves `manifest` as it was.
    pub fn flush(&self, manifest: &mut Manifest) -> Result<(), FlushError> {
        let projects = self
            .projects
            .iter()
            .map(ProjectRow::to_project)
            .collect::<Result<Vec<_>, _>>()?;

        let dc = &mut manifest.dublin_core;
        dc.conformsto = self.conforms_to.clone();
        dc.creator = self.creator.clone();
        dc.description = self.description.clone();
        dc.format = self.format.clone();
        dc.identifier = self.identifier.clone();
        dc.issued = format_date(self.issued);
        dc.modified = format_date(self.modified);
        dc.language.direction = self.language_direction.clone();
        dc.language.identifier = self.language_identifier.clone();
        dc.language.title = self.language_title.clone();
        dc.publisher = self.publisher.clone();
        dc.rights = self.rights.clone();
        dc.subject = self.subject.clone();
        dc.title = self.title.clone();
        dc.kind = self.kind.clone();
        dc.version = self.version.clone();
        dc.contributor = texts(&self.contributors);
        dc.relation = texts(&self.relations);
        dc.source = self.sources.iter().map(SourceRow::to_source).collect();

        manifest.checking.checking_level = self.checking_level.clone();
        manifest.checking.checking_entity = texts(&self.checking_entities);
        manifest.projects = projects;
        Ok(())
    }

    pub fn contributor_texts(&self) -> Vec<String> {
        texts(&self.contributors)
    }

    pub fn relation_texts(&self) -> Vec<String> {
        texts(&self.relations)
    }

    pub fn checking_entity_texts(&self) -> Vec<String> {
        texts(&self.checking_entities)
    }

    pub fn is_empty(&self) -> bool {
        self.contributors.is_empty()
            && self.relations.is_empty()
            && self.sources.is_empty()
            && self.checking_entities.is_empty()
            && self.projects.is_empty()
            && [
                &self.conforms_to,
                &self.creator,
                &self.description,
                &self.format,
                &self.identifier,
                &self.language_direction,
                &self.language_identifier,
                &self.language_title,
                &self.publisher,
                &self.rights,
                &self.subject,
                &self.title,
                &self.kind,
                &self.version,
                &self.checking_level,
            ]
            .iter()
            .all(|value| value.is_empty())
    }

    fn notify(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

/// Removes the item with `id`; returns `true` when one was found.
pub fn remove_item(items: &mut Vec<TextItem>, id: Uuid) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    before != items.len()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// 解析 manifest 日期，僅接受補零的 `YYYY-MM-DD`。 / Parses a manifest date; only zero-padded
/// `YYYY-MM-DD` is accepted, so a loaded date always saves back as the same text.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, LoadError> {
    parse_iso_date(value).map_err(|source| LoadError::Date {
        field,
        value: value.to_string(),
        source,
    })
}

pub fn format_date(date: NaiveDate) -> String {
    format_iso_date(date)
}

fn texts(items: &[TextItem]) -> Vec<String> {
    items.iter().map(|item| item.text.clone()).collect()
}
