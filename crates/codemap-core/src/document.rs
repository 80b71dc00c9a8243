//! The structural input document and its lenient decoding.
//!
//! Every mapping is an [`IndexMap`] so that symbol and file order follow the
//! source JSON; item stacking and tie-breaks downstream depend on it.

use crate::error::{CodemapError, Result};
use indexmap::IndexMap;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// A used-symbol descriptor: either the bare module hint or a structured form
/// naming the methods called on the target (`obj.method()` shaped usages).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReferenceDescriptor {
    Module(String),
    Structured {
        #[serde(
            default,
            alias = "module",
            deserialize_with = "lenient",
            skip_serializing_if = "Option::is_none"
        )]
        file: Option<String>,
        #[serde(default, deserialize_with = "lenient")]
        methods: Vec<String>,
    },
}

impl ReferenceDescriptor {
    pub fn module_hint(&self) -> &str {
        match self {
            ReferenceDescriptor::Module(hint) => hint,
            ReferenceDescriptor::Structured { file, .. } => file.as_deref().unwrap_or(""),
        }
    }

    pub fn methods(&self) -> &[String] {
        match self {
            ReferenceDescriptor::Module(_) => &[],
            ReferenceDescriptor::Structured { methods, .. } => methods,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub args: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub start_line: u32,
    #[serde(default, deserialize_with = "lenient")]
    pub end_line: u32,
    #[serde(default, deserialize_with = "lenient")]
    pub is_api_endpoint: bool,
    #[serde(default, deserialize_with = "lenient_map")]
    pub used_functions: IndexMap<String, ReferenceDescriptor>,
    /// Present (even when empty) only for classes.
    #[serde(
        default,
        deserialize_with = "lenient_optional_map",
        skip_serializing_if = "Option::is_none"
    )]
    pub methods: Option<IndexMap<String, SymbolRecord>>,
}

impl SymbolRecord {
    pub fn function(args: &[&str]) -> Self {
        Self {
            args: args.iter().map(|a| a.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn class() -> Self {
        Self {
            methods: Some(IndexMap::new()),
            ..Default::default()
        }
    }

    pub fn with_reference(mut self, name: &str, descriptor: ReferenceDescriptor) -> Self {
        self.used_functions.insert(name.to_string(), descriptor);
        self
    }

    pub fn with_method(mut self, name: &str, method: SymbolRecord) -> Self {
        self.methods
            .get_or_insert_with(IndexMap::new)
            .insert(name.to_string(), method);
        self
    }

    pub fn is_class(&self) -> bool {
        self.methods.is_some()
    }

    pub fn method_names(&self) -> Vec<String> {
        self.methods
            .as_ref()
            .map(|methods| methods.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    #[serde(default, deserialize_with = "lenient")]
    pub is_router: bool,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    pub files: IndexMap<String, IndexMap<String, SymbolRecord>>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub file_meta: IndexMap<String, FileMeta>,
    /// Opaque change-detection token supplied by the data source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_value(value)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Decode a loosely-shaped document. Only a non-object top level is an error;
    /// malformed entries below it are skipped.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut root) = value else {
            return Err(CodemapError::NotAnObject {
                found: value_kind(&value),
            });
        };

        let mut document = Document::new();

        match root.remove("files") {
            Some(Value::Object(files)) => {
                for (path, symbols) in files {
                    let Value::Object(symbols) = symbols else {
                        tracing::warn!("Skipping file {path}: symbol table is not an object");
                        continue;
                    };
                    let mut records = IndexMap::with_capacity(symbols.len());
                    for (name, record) in symbols {
                        match decode_symbol(record) {
                            Some(record) => {
                                records.insert(name, record);
                            }
                            None => {
                                tracing::warn!("Skipping malformed symbol {name} in {path}");
                            }
                        }
                    }
                    document.files.insert(path, records);
                }
            }
            Some(other) => {
                tracing::warn!(
                    "Ignoring `files`: expected an object, found {}",
                    value_kind(&other)
                );
            }
            None => {
                tracing::warn!("Document has no `files` key; treating it as empty");
            }
        }

        if let Some(Value::Object(meta)) = root.remove("file_meta") {
            for (path, entry) in meta {
                if entry.is_object()
                    && let Ok(meta) = serde_json::from_value::<FileMeta>(entry)
                {
                    document.file_meta.insert(path, meta);
                }
            }
        }

        if let Some(Value::String(version)) = root.remove("version") {
            document.version = Some(version);
        }

        Ok(document)
    }

    pub fn insert_symbol(&mut self, path: &str, name: &str, record: SymbolRecord) {
        self.files
            .entry(path.to_string())
            .or_default()
            .insert(name.to_string(), record);
    }

    pub fn meta(&self, path: &str) -> Option<&FileMeta> {
        self.file_meta.get(path)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Document::from_value(value).map_err(D::Error::custom)
    }
}

fn decode_symbol(value: Value) -> Option<SymbolRecord> {
    if !value.is_object() {
        return None;
    }
    serde_json::from_value(value).ok()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Wrong-shaped optional fields decode as their default.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn lenient_map<'de, D, T>(deserializer: D) -> std::result::Result<IndexMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decode_entries(value).unwrap_or_default())
}

fn lenient_optional_map<'de, D, T>(
    deserializer: D,
) -> std::result::Result<Option<IndexMap<String, T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decode_entries(value))
}

fn decode_entries<T: DeserializeOwned>(value: Value) -> Option<IndexMap<String, T>> {
    let Value::Object(entries) = value else {
        return None;
    };
    Some(
        entries
            .into_iter()
            .filter_map(|(key, entry)| {
                // Sequences would otherwise decode positionally into struct shapes.
                if entry.is_array() {
                    return None;
                }
                serde_json::from_value(entry).ok().map(|decoded| (key, decoded))
            })
            .collect(),
    )
}
