use rceditor_container::{Project, Source};
use thiserror::Error;

/// Category shown for a project whose manifest entry lists none.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// 列轉換為 manifest 實體時的錯誤。 / Raised when an edited row cannot become a manifest entity.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowConversionError {
    #[error("project '{identifier}' has a non-numeric sort value '{value}'")]
    InvalidSort { identifier: String, value: String },
}

/// 來源列。 / Editable row for a `source` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRow {
    pub identifier: String,
    pub language: String,
    pub version: String,
}

impl SourceRow {
    pub fn to_source(&self) -> Source {
        Source::new(
            self.identifier.clone(),
            self.language.clone(),
            self.version.clone(),
        )
    }
}

impl From<&Source> for SourceRow {
    fn from(source: &Source) -> Self {
        Self {
            identifier: source.identifier.clone(),
            language: source.language.clone(),
            version: source.version.clone(),
        }
    }
}

/// 專案列；`sort` 保留使用者輸入的文字。 / Editable row for a project entry; `sort`
/// keeps the text as typed until it is converted back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRow {
    pub title: String,
    pub versification: String,
    pub identifier: String,
    pub sort: String,
    pub path: String,
    pub category: String,
}

impl Default for ProjectRow {
    fn default() -> Self {
        Self {
            title: String::new(),
            versification: String::new(),
            identifier: String::new(),
            sort: "0".to_string(),
            path: String::new(),
            category: UNKNOWN_CATEGORY.to_string(),
        }
    }
}

impl ProjectRow {
    /// Only the row's single category survives; the sentinel maps back to no category.
    pub fn to_project(&self) -> Result<Project, RowConversionError> {
        let sort = self
            .sort
            .trim()
            .parse::<i64>()
            .map_err(|_| RowConversionError::InvalidSort {
                identifier: self.identifier.clone(),
                value: self.sort.clone(),
            })?;
        let category = self.category.trim();
        let categories = if category.is_empty() || category == UNKNOWN_CATEGORY {
            Vec::new()
        } else {
            vec![category.to_string()]
        };
        Ok(Project {
            title: self.title.clone(),
            versification: self.versification.clone(),
            identifier: self.identifier.clone(),
            sort,
            path: self.path.clone(),
            categories,
        })
    }
}

impl From<&Project> for ProjectRow {
    fn from(project: &Project) -> Self {
        Self {
            title: project.title.clone(),
            versification: project.versification.clone(),
            identifier: project.identifier.clone(),
            sort: project.sort.to_string(),
            path: project.path.clone(),
            category: project
                .categories
                .first()
                .cloned()
                .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()),
        }
    }
}
