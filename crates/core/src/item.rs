use std::fmt;
use std::hash::{Hash, Hasher};

use uuid::Uuid;

/// 具穩定識別碼的可編輯文字列。 / Editable text row carrying a stable identity.
///
/// Equality and hashing only look at the identifier, so a row keeps matching itself
/// while its text is being edited.
#[derive(Debug, Clone)]
pub struct TextItem {
    id: Uuid,
    pub text: String,
}

impl TextItem {
    /// 以新的識別碼建立項目。 / Creates an item with a freshly generated identifier.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl PartialEq for TextItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TextItem {}

impl Hash for TextItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TextItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for TextItem {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for TextItem {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}
