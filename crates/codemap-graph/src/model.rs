//! Render-ready data: file boxes, item boxes and connection plans.
//!
//! Everything here is plain serializable data. Positions of items and connection
//! anchors are relative to their owning file box unless stated otherwise.

use crate::geometry::{AnchorSide, EdgePath, GridCell, Rect, Vec2};
use codemap_core::{ConnectionId, FileId, ItemId, ItemKind};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Handle of an item inside a graph: owning file plus stacking index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemRef {
    pub file: FileId,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "itemId", rename_all = "camelCase")]
pub enum ReferenceTarget {
    Resolved(ItemId),
    SelfReference,
    Unresolved,
}

/// One outgoing used-symbol entry of an item, resolved or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceRecord {
    pub target_name: String,
    /// Normalized module hint
    pub module_hint: String,
    /// `symbol` for the item's own usages, `Class.method` for a method's usages
    pub source_label: String,
    pub target_methods: Vec<String>,
    pub target: ReferenceTarget,
}

impl ReferenceRecord {
    pub fn is_resolved(&self) -> bool {
        matches!(self.target, ReferenceTarget::Resolved(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBox {
    pub id: ItemId,
    pub name: String,
    pub kind: ItemKind,
    pub args: Vec<String>,
    /// Method names in source order; empty for functions
    pub methods: Vec<String>,
    pub is_api_endpoint: bool,
    pub start_line: u32,
    pub end_line: u32,
    pub file_id: FileId,
    pub file_path: String,
    pub module_key: String,
    pub position: Vec2,
    pub size: Vec2,
    pub references: Vec<ReferenceRecord>,
}

impl ItemBox {
    /// Absolute rectangle given the owning file's position.
    pub fn rect_at(&self, file_position: Vec2) -> Rect {
        Rect::from_pos_size(file_position + self.position, self.size)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileBox {
    pub id: FileId,
    pub path: String,
    pub module_key: String,
    /// Last two path segments
    pub display_name: String,
    pub is_router: bool,
    pub grid: GridCell,
    /// Absolute pixel position of the top-left corner
    pub position: Vec2,
    pub size: Vec2,
    pub items: Vec<ItemBox>,
}

impl FileBox {
    pub fn item(&self, index: usize) -> Option<&ItemBox> {
        self.items.get(index)
    }
}

/// `pkg/utils/logger.py` -> `utils/logger.py`
pub fn display_name(path: &str) -> String {
    let segments: Vec<&str> = path
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty())
        .collect();
    let start = segments.len().saturating_sub(2);
    segments[start..].join("/")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointAnchor {
    pub file_id: FileId,
    pub file_path: String,
    pub item_id: ItemId,
    /// Item position relative to its file box
    pub position: Vec2,
    pub size: Vec2,
    /// Absolute attachment point on the item's edge
    pub point: Vec2,
    pub side: AnchorSide,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionPlan {
    pub id: ConnectionId,
    pub source: EndpointAnchor,
    pub target: EndpointAnchor,
    pub label: String,
    /// Index among connections sharing the same source/target item pair
    pub occurrence: usize,
    pub offset: f32,
    pub path: EdgePath,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CanvasBounds {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramLayout {
    pub file_boxes: Vec<FileBox>,
    pub connections: Vec<ConnectionPlan>,
    pub canvas_bounds: CanvasBounds,
}

impl DiagramLayout {
    pub fn file_by_path(&self, path: &str) -> Option<&FileBox> {
        self.file_boxes.iter().find(|file| file.path == path)
    }

    pub fn item(&self, id: &ItemId) -> Option<&ItemBox> {
        self.file_boxes
            .iter()
            .flat_map(|file| file.items.iter())
            .find(|item| &item.id == id)
    }
}

/// User-supplied absolute positions keyed by file path (drags, saved layouts).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionOverrides(IndexMap<String, Vec2>);

impl PositionOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, path: impl Into<String>, position: Vec2) {
        self.0.insert(path.into(), position);
    }

    pub fn get(&self, path: &str) -> Option<Vec2> {
        self.0.get(path).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_keeps_last_two_segments() {
        assert_eq!(display_name("pkg/utils/logger.py"), "utils/logger.py");
        assert_eq!(display_name("main.py"), "main.py");
        assert_eq!(display_name("C:\\src\\app\\main.py"), "app/main.py");
        assert_eq!(display_name("/abs/dir/"), "abs/dir");
    }

    #[test]
    fn test_position_overrides_round_trip_as_plain_map() {
        let mut overrides = PositionOverrides::new();
        overrides.set("a.py", Vec2::new(10.0, 20.0));
        let json = serde_json::to_string(&overrides).unwrap();
        assert_eq!(json, r#"{"a.py":{"x":10.0,"y":20.0}}"#);

        let parsed: PositionOverrides = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.get("a.py"), Some(Vec2::new(10.0, 20.0)));
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_reference_target_serialization() {
        let record = ReferenceRecord {
            target_name: "foo".into(),
            module_hint: "a".into(),
            source_label: "bar".into(),
            target_methods: vec![],
            target: ReferenceTarget::Resolved(ItemId::new(FileId(0), "foo")),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["target"]["status"], "resolved");
        assert_eq!(value["target"]["itemId"], "file-0::foo");
        assert!(record.is_resolved());
    }
}
