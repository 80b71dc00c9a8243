use serde::{Deserialize, Serialize};
use std::fmt;

pub mod document;
pub mod error;
pub mod module_path;

pub use document::{Document, FileMeta, ReferenceDescriptor, SymbolRecord};
pub use error::CodemapError;
pub use module_path::{module_key_for_path, normalize_file_path, normalize_module_hint, slash_form};

/// Sequential identifier of a file box, assigned in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub usize);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file-{}", self.0)
    }
}

/// Identifier of an item box: `<file id>::<symbol name>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(file: FileId, symbol: &str) -> Self {
        Self(format!("{file}::{symbol}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a connection: `<source item>-><target item>#<occurrence>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub String);

impl ConnectionId {
    pub fn new(source: &ItemId, target: &ItemId, occurrence: usize) -> Self {
        Self(format!("{source}->{target}#{occurrence}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Function,
    Class,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_formats() {
        let file = FileId(3);
        let source = ItemId::new(file, "bar");
        let target = ItemId::new(FileId(0), "foo");

        assert_eq!(file.to_string(), "file-3");
        assert_eq!(source.as_str(), "file-3::bar");
        assert_eq!(
            ConnectionId::new(&source, &target, 1).as_str(),
            "file-3::bar->file-0::foo#1"
        );
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let json = serde_json::to_string(&ItemId::new(FileId(1), "foo")).unwrap();
        assert_eq!(json, "\"file-1::foo\"");
        assert_eq!(serde_json::to_string(&FileId(7)).unwrap(), "7");
        assert_eq!(
            serde_json::to_string(&ItemKind::Class).unwrap(),
            "\"class\""
        );
    }
}
