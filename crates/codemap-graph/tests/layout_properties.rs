use codemap_core::Document;
use codemap_graph::{LayoutEngine, PositionOverrides};
use proptest::prelude::*;
use serde_json::{Map, Value, json};
use std::collections::{HashMap, HashSet};

/// Files `m0.py..` each defining `f<file>_<n>`, with references given as
/// `(source file, source symbol, target file, target symbol)` picks.
fn document_strategy() -> impl Strategy<Value = Document> {
    (1usize..8, 1usize..4).prop_flat_map(|(files, symbols)| {
        let pick = (0..files, 0..symbols, 0..files, 0..symbols);
        proptest::collection::vec(pick, 0..24).prop_map(move |refs| {
            let mut root = Map::new();
            for file in 0..files {
                let mut table = Map::new();
                for symbol in 0..symbols {
                    let mut used = Map::new();
                    for &(sf, ss, tf, ts) in &refs {
                        if sf == file && ss == symbol {
                            used.insert(format!("f{tf}_{ts}"), json!(format!("m{tf}")));
                        }
                    }
                    table.insert(format!("f{file}_{symbol}"), json!({ "used_functions": used }));
                }
                root.insert(format!("m{file}.py"), Value::Object(table));
            }
            Document::from_value(json!({ "files": root })).unwrap_or_default()
        })
    })
}

proptest! {
    #[test]
    fn prop_layout_is_deterministic(document in document_strategy()) {
        let engine = LayoutEngine::default();
        let first = engine.layout(&document, &PositionOverrides::new());
        let second = engine.layout(&document, &PositionOverrides::new());
        prop_assert_eq!(first.layout, second.layout);
    }

    #[test]
    fn prop_no_self_connections(document in document_strategy()) {
        let output = LayoutEngine::default().layout(&document, &PositionOverrides::new());
        for plan in &output.layout.connections {
            prop_assert_ne!(&plan.source.item_id, &plan.target.item_id);
        }
    }

    #[test]
    fn prop_grid_cells_are_unique(document in document_strategy()) {
        let output = LayoutEngine::default().layout(&document, &PositionOverrides::new());
        let cells: HashSet<_> = output.layout.file_boxes.iter().map(|f| f.grid).collect();
        prop_assert_eq!(cells.len(), output.layout.file_boxes.len());
        prop_assert!(cells.iter().all(|c| c.x >= 0 && c.y >= 0));
    }

    #[test]
    fn prop_occurrences_are_dense_per_item_pair(document in document_strategy()) {
        let output = LayoutEngine::default().layout(&document, &PositionOverrides::new());
        let mut seen = HashMap::new();
        for plan in &output.layout.connections {
            let next = seen
                .entry((plan.source.item_id.clone(), plan.target.item_id.clone()))
                .or_insert(0usize);
            prop_assert_eq!(plan.occurrence, *next);
            *next += 1;
        }
    }

    #[test]
    fn prop_highlight_is_symmetric(document in document_strategy()) {
        let output = LayoutEngine::default().layout(&document, &PositionOverrides::new());
        for plan in &output.layout.connections {
            let outgoing = output.highlight.outgoing_for_item(&plan.source.item_id);
            prop_assert!(outgoing.item_ids.contains(&plan.target.item_id));
            prop_assert!(outgoing.connection_ids.contains(&plan.id));

            let incoming = output.highlight.incoming_for_item(&plan.target.item_id);
            prop_assert!(incoming.item_ids.contains(&plan.source.item_id));
            prop_assert!(incoming.connection_ids.contains(&plan.id));

            prop_assert!(output.highlight.outgoing_for_file(plan.source.file_id).connection_ids.contains(&plan.id));
            prop_assert!(output.highlight.incoming_for_file(plan.target.file_id).connection_ids.contains(&plan.id));
        }
    }

    #[test]
    fn prop_highlight_sets_hold_only_own_connections(document in document_strategy()) {
        let output = LayoutEngine::default().layout(&document, &PositionOverrides::new());
        let plans: HashMap<_, _> = output
            .layout
            .connections
            .iter()
            .map(|plan| (plan.id.clone(), plan))
            .collect();

        for item in output.layout.file_boxes.iter().flat_map(|f| f.items.iter()) {
            let outgoing = output.highlight.outgoing_for_item(&item.id);
            for id in &outgoing.connection_ids {
                prop_assert_eq!(&plans[id].source.item_id, &item.id);
            }
            for target in &outgoing.item_ids {
                prop_assert!(plans.values().any(|p| p.source.item_id == item.id && &p.target.item_id == target));
            }

            let incoming = output.highlight.incoming_for_item(&item.id);
            for id in &incoming.connection_ids {
                prop_assert_eq!(&plans[id].target.item_id, &item.id);
            }
            for source in &incoming.item_ids {
                prop_assert!(plans.values().any(|p| p.target.item_id == item.id && &p.source.item_id == source));
            }
        }

        for file in &output.layout.file_boxes {
            for id in &output.highlight.outgoing_for_file(file.id).connection_ids {
                prop_assert_eq!(plans[id].source.file_id, file.id);
            }
            for id in &output.highlight.incoming_for_file(file.id).connection_ids {
                prop_assert_eq!(plans[id].target.file_id, file.id);
            }
        }
    }

    #[test]
    fn prop_boxes_fit_inside_canvas(document in document_strategy()) {
        let output = LayoutEngine::default().layout(&document, &PositionOverrides::new());
        let bounds = output.layout.canvas_bounds;
        for file in &output.layout.file_boxes {
            prop_assert!(file.position.x + file.size.x <= bounds.width);
            prop_assert!(file.position.y + file.size.y <= bounds.height);
        }
    }
}
