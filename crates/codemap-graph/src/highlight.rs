use crate::model::ConnectionPlan;
use codemap_core::{ConnectionId, FileId, ItemId};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

/// Items and connections to emphasize for a selection.
///
/// For outgoing queries `item_ids` holds the targets; for incoming queries it
/// holds the sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightSet {
    pub item_ids: IndexSet<ItemId>,
    pub connection_ids: IndexSet<ConnectionId>,
}

impl HighlightSet {
    pub fn is_empty(&self) -> bool {
        self.item_ids.is_empty() && self.connection_ids.is_empty()
    }

    fn add(&mut self, item: &ItemId, connection: &ConnectionId) {
        self.item_ids.insert(item.clone());
        self.connection_ids.insert(connection.clone());
    }
}

/// Precomputed per-item and per-file adjacency over a set of connection plans.
///
/// Lookups are map hits; unknown ids answer with a shared empty set.
#[derive(Debug, Clone, Default)]
pub struct HighlightIndex {
    outgoing_by_item: IndexMap<ItemId, HighlightSet>,
    incoming_by_item: IndexMap<ItemId, HighlightSet>,
    outgoing_by_file: IndexMap<FileId, HighlightSet>,
    incoming_by_file: IndexMap<FileId, HighlightSet>,
    empty: HighlightSet,
}

impl HighlightIndex {
    pub fn build(connections: &[ConnectionPlan]) -> Self {
        let mut index = Self::default();
        for plan in connections {
            let source = &plan.source.item_id;
            let target = &plan.target.item_id;

            index
                .outgoing_by_item
                .entry(source.clone())
                .or_default()
                .add(target, &plan.id);
            index
                .incoming_by_item
                .entry(target.clone())
                .or_default()
                .add(source, &plan.id);
            index
                .outgoing_by_file
                .entry(plan.source.file_id)
                .or_default()
                .add(target, &plan.id);
            index
                .incoming_by_file
                .entry(plan.target.file_id)
                .or_default()
                .add(source, &plan.id);
        }
        index
    }

    pub fn outgoing_for_item(&self, item: &ItemId) -> &HighlightSet {
        self.outgoing_by_item.get(item).unwrap_or(&self.empty)
    }

    pub fn incoming_for_item(&self, item: &ItemId) -> &HighlightSet {
        self.incoming_by_item.get(item).unwrap_or(&self.empty)
    }

    pub fn outgoing_for_file(&self, file: FileId) -> &HighlightSet {
        self.outgoing_by_file.get(&file).unwrap_or(&self.empty)
    }

    pub fn incoming_for_file(&self, file: FileId) -> &HighlightSet {
        self.incoming_by_file.get(&file).unwrap_or(&self.empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use crate::config::LayoutConfig;
    use crate::materializer::Materializer;
    use crate::model::PositionOverrides;
    use crate::placement::GridPlacer;
    use codemap_core::Document;
    use serde_json::json;

    fn plans(value: serde_json::Value) -> Vec<ConnectionPlan> {
        let config = LayoutConfig::default();
        let document = Document::from_value(value).unwrap();
        let graph = GraphBuilder::new(&config).build(&document);
        let placement = GridPlacer::from_config(&config).place(&graph);
        Materializer::new(&config)
            .materialize(&graph, &placement, &PositionOverrides::new())
            .connections
    }

    fn ids(set: &HighlightSet) -> Vec<&str> {
        set.item_ids.iter().map(|id| id.as_str()).collect()
    }

    #[test]
    fn test_item_and_file_queries() {
        let plans = plans(json!({
            "files": {
                "a.py": {"foo": {}, "baz": {}},
                "b.py": {
                    "bar": {"used_functions": {"foo": "a", "baz": "a"}},
                    "qux": {"used_functions": {"foo": "a"}}
                }
            }
        }));
        let index = HighlightIndex::build(&plans);

        let bar = ItemId::new(FileId(1), "bar");
        let foo = ItemId::new(FileId(0), "foo");

        let out = index.outgoing_for_item(&bar);
        assert_eq!(ids(out), vec!["file-0::foo", "file-0::baz"]);
        assert_eq!(out.connection_ids.len(), 2);

        let incoming = index.incoming_for_item(&foo);
        assert_eq!(ids(incoming), vec!["file-1::bar", "file-1::qux"]);

        assert_eq!(index.outgoing_for_file(FileId(1)).connection_ids.len(), 3);
        assert_eq!(
            ids(index.outgoing_for_file(FileId(1))),
            vec!["file-0::foo", "file-0::baz"]
        );
        assert_eq!(index.incoming_for_file(FileId(0)).connection_ids.len(), 3);
        assert!(index.outgoing_for_file(FileId(0)).is_empty());
    }

    #[test]
    fn test_unknown_ids_are_empty() {
        let index = HighlightIndex::build(&[]);
        assert!(index.outgoing_for_item(&ItemId::new(FileId(9), "nope")).is_empty());
        assert!(index.incoming_for_file(FileId(9)).is_empty());
    }

    #[test]
    fn test_parallel_connections_share_item_but_not_id() {
        let plans = plans(json!({
            "files": {
                "a.py": {"foo": {}},
                "b.py": {
                    "Svc": {
                        "used_functions": {"foo": "a"},
                        "methods": {"run": {"used_functions": {"foo": "a"}}}
                    }
                }
            }
        }));
        let index = HighlightIndex::build(&plans);
        let out = index.outgoing_for_item(&ItemId::new(FileId(1), "Svc"));
        assert_eq!(out.item_ids.len(), 1);
        assert_eq!(out.connection_ids.len(), 2);
    }
}
