use serde::{Deserialize, Serialize};

/// Resource Container 的 manifest 文件。 / The manifest document stored in `manifest.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Manifest {
    #[serde(default)]
    pub dublin_core: DublinCore,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub checking: Checking,
}

impl Manifest {
    /// 建立新容器時使用的預設 manifest。 / Manifest written into a freshly created container.
    pub fn new(dublin_core: DublinCore, projects: Vec<Project>, checking: Checking) -> Self {
        Self {
            dublin_core,
            projects,
            checking,
        }
    }
}

/// Dublin Core 書目欄位。 / Dublin Core bibliographic fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DublinCore {
    #[serde(default, deserialize_with = "scalar::lenient")]
    pub conformsto: String,
    #[serde(default)]
    pub contributor: Vec<String>,
    #[serde(default, deserialize_with = "scalar::lenient")]
    pub creator: String,
    #[serde(default, deserialize_with = "scalar::lenient")]
    pub description: String,
    #[serde(default, deserialize_with = "scalar::lenient")]
    pub format: String,
    #[serde(default, deserialize_with = "scalar::lenient")]
    pub identifier: String,
    #[serde(default, deserialize_with = "scalar::lenient")]
    pub issued: String,
    #[serde(default)]
    pub language: Language,
    #[serde(default, deserialize_with = "scalar::lenient")]
    pub modified: String,
    #[serde(default, deserialize_with = "scalar::lenient")]
    pub publisher: String,
    #[serde(default)]
    pub relation: Vec<String>,
    #[serde(default, deserialize_with = "scalar::lenient")]
    pub rights: String,
    #[serde(default)]
    pub source: Vec<Source>,
    #[serde(default, deserialize_with = "scalar::lenient")]
    pub subject: String,
    #[serde(default, deserialize_with = "scalar::lenient")]
    pub title: String,
    #[serde(default, rename = "type", deserialize_with = "scalar::lenient")]
    pub kind: String,
    #[serde(default, deserialize_with = "scalar::lenient")]
    pub version: String,
}

/// 內容語言資訊。 / Language of the container content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Language {
    #[serde(default, deserialize_with = "scalar::lenient")]
    pub direction: String,
    #[serde(default, deserialize_with = "scalar::lenient")]
    pub identifier: String,
    #[serde(default, deserialize_with = "scalar::lenient")]
    pub title: String,
}

/// 衍生來源。 / A source this container was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Source {
    #[serde(default, deserialize_with = "scalar::lenient")]
    pub identifier: String,
    #[serde(default, deserialize_with = "scalar::lenient")]
    pub language: String,
    #[serde(default, deserialize_with = "scalar::lenient")]
    pub version: String,
}

impl Source {
    pub fn new(
        identifier: impl Into<String>,
        language: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            language: language.into(),
            version: version.into(),
        }
    }
}

/// 容器內的專案項目。 / A project entry listed by the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Project {
    #[serde(default, deserialize_with = "scalar::lenient")]
    pub title: String,
    #[serde(default, deserialize_with = "scalar::lenient")]
    pub versification: String,
    #[serde(default, deserialize_with = "scalar::lenient")]
    pub identifier: String,
    #[serde(default)]
    pub sort: i64,
    #[serde(default, deserialize_with = "scalar::lenient")]
    pub path: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// 審校資訊。 / Checking (review) metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Checking {
    #[serde(default)]
    pub checking_entity: Vec<String>,
    #[serde(default, deserialize_with = "scalar::lenient")]
    pub checking_level: String,
}

mod scalar {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use serde_yaml::Value;

    /// Accepts any YAML scalar for a text field; hand-edited manifests often
    /// carry `version: 1` unquoted. Numbers keep serde_yaml's rendering, so
    /// `1.0` stays `1.0`. Null becomes an empty string.
    pub fn lenient<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(String::new()),
            Value::String(text) => Ok(text),
            Value::Number(number) => Ok(number.to_string()),
            Value::Bool(flag) => Ok(flag.to_string()),
            other => Err(D::Error::custom(format!(
                "expected a scalar, found {}",
                kind(&other)
            ))),
        }
    }

    fn kind(value: &Value) -> &'static str {
        match value {
            Value::Sequence(_) => "a sequence",
            Value::Mapping(_) => "a mapping",
            Value::Tagged(_) => "a tagged value",
            _ => "a scalar",
        }
    }
}
