use crate::config::LayoutConfig;
use crate::geometry::{GridCell, Vec2};
use crate::model::{
    FileBox, ItemBox, ItemRef, ReferenceRecord, ReferenceTarget, display_name,
};
use crate::resolver::SymbolIndex;
use codemap_core::{
    Document, FileId, ItemId, ItemKind, ReferenceDescriptor, SymbolRecord, module_key_for_path,
    normalize_module_hint,
};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashMap;

/// Undirected reference counts keyed by `(min file, max file)`.
pub type EdgeWeights = IndexMap<(FileId, FileId), u32>;

/// A resolved, non-self reference waiting for geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConnection {
    pub source: ItemRef,
    pub target: ItemRef,
    pub source_label: String,
    pub target_name: String,
    pub target_methods: Vec<String>,
    /// Index among pending connections with the same source/target pair
    pub occurrence: usize,
}

impl PendingConnection {
    pub fn label(&self) -> String {
        if self.target_methods.is_empty() {
            format!("{} -> {}", self.source_label, self.target_name)
        } else {
            format!(
                "{} -> {} ({})",
                self.source_label,
                self.target_name,
                self.target_methods.join(", ")
            )
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStats {
    pub files: usize,
    pub items: usize,
    pub references: usize,
    pub resolved: usize,
    pub unresolved: usize,
    pub self_references: usize,
}

#[derive(Debug, Clone, Default)]
pub struct CodeGraph {
    /// Indexed by `FileId`
    pub files: Vec<FileBox>,
    pub pending: Vec<PendingConnection>,
    pub edge_weights: EdgeWeights,
    pub stats: BuildStats,
}

impl CodeGraph {
    pub fn file(&self, id: FileId) -> Option<&FileBox> {
        self.files.get(id.0)
    }

    pub fn item(&self, item: ItemRef) -> Option<&ItemBox> {
        self.file(item.file).and_then(|file| file.item(item.index))
    }

    pub fn edge_weight(&self, a: FileId, b: FileId) -> u32 {
        self.edge_weights
            .get(&ordered_pair(a, b))
            .copied()
            .unwrap_or(0)
    }
}

fn ordered_pair(a: FileId, b: FileId) -> (FileId, FileId) {
    if a <= b { (a, b) } else { (b, a) }
}

/// A used-symbol entry flattened out of a symbol or one of its methods.
struct RawReference<'a> {
    target_name: &'a str,
    descriptor: &'a ReferenceDescriptor,
    source_label: String,
}

fn collect_raw_references<'a>(name: &str, record: &'a SymbolRecord) -> Vec<RawReference<'a>> {
    let mut raw: Vec<RawReference<'a>> = record
        .used_functions
        .iter()
        .map(|(target_name, descriptor)| RawReference {
            target_name,
            descriptor,
            source_label: name.to_string(),
        })
        .collect();

    if let Some(methods) = &record.methods {
        for (method_name, method) in methods {
            for (target_name, descriptor) in &method.used_functions {
                raw.push(RawReference {
                    target_name,
                    descriptor,
                    source_label: format!("{name}.{method_name}"),
                });
            }
        }
    }
    raw
}

/// Turns a [`Document`] into file boxes, item boxes and resolved connections.
pub struct GraphBuilder<'a> {
    config: &'a LayoutConfig,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, document: &Document) -> CodeGraph {
        let mut graph = CodeGraph::default();
        let mut index = SymbolIndex::new();

        for (file_idx, (path, symbols)) in document.files.iter().enumerate() {
            let file = self.file_box(FileId(file_idx), path, symbols, document);
            for (item_idx, item) in file.items.iter().enumerate() {
                index.register(
                    &item.name,
                    &file.module_key,
                    path,
                    ItemRef {
                        file: file.id,
                        index: item_idx,
                    },
                );
            }
            graph.files.push(file);
        }

        let mut occurrences: HashMap<(ItemRef, ItemRef), usize> = HashMap::new();
        for (file_idx, symbols) in document.files.values().enumerate() {
            for (item_idx, (name, record)) in symbols.iter().enumerate() {
                let source = ItemRef {
                    file: FileId(file_idx),
                    index: item_idx,
                };
                let mut records = Vec::new();

                for raw in collect_raw_references(name, record) {
                    graph.stats.references += 1;
                    let module_hint = normalize_module_hint(raw.descriptor.module_hint());
                    let target_methods = raw.descriptor.methods().to_vec();

                    let target = match index.resolve(raw.target_name, &module_hint) {
                        None => {
                            graph.stats.unresolved += 1;
                            ReferenceTarget::Unresolved
                        }
                        Some(target) if target == source => {
                            graph.stats.self_references += 1;
                            ReferenceTarget::SelfReference
                        }
                        Some(target) => {
                            graph.stats.resolved += 1;
                            let occurrence = occurrences.entry((source, target)).or_insert(0);
                            graph.pending.push(PendingConnection {
                                source,
                                target,
                                source_label: raw.source_label.clone(),
                                target_name: raw.target_name.to_string(),
                                target_methods: target_methods.clone(),
                                occurrence: *occurrence,
                            });
                            *occurrence += 1;
                            *graph
                                .edge_weights
                                .entry(ordered_pair(source.file, target.file))
                                .or_insert(0) += 1;

                            match graph.item(target) {
                                Some(item) => ReferenceTarget::Resolved(item.id.clone()),
                                None => ReferenceTarget::Unresolved,
                            }
                        }
                    };

                    records.push(ReferenceRecord {
                        target_name: raw.target_name.to_string(),
                        module_hint,
                        source_label: raw.source_label,
                        target_methods,
                        target,
                    });
                }

                if let Some(item) = graph.files[file_idx].items.get_mut(item_idx) {
                    item.references = records;
                }
            }
        }

        graph.stats.files = graph.files.len();
        graph.stats.items = index.len();

        tracing::debug!(
            "Built graph: {} files, {} items, {} references ({} resolved, {} unresolved, {} self)",
            graph.stats.files,
            graph.stats.items,
            graph.stats.references,
            graph.stats.resolved,
            graph.stats.unresolved,
            graph.stats.self_references
        );

        graph
    }

    /// Sizes and child offsets are fixed here: items stack in source order.
    fn file_box(
        &self,
        id: FileId,
        path: &str,
        symbols: &IndexMap<String, SymbolRecord>,
        document: &Document,
    ) -> FileBox {
        let config = self.config;
        let meta = document.meta(path);
        let module_key = module_key_for_path(path, meta.and_then(|m| m.module.as_deref()));

        let width = config
            .min_file_width
            .max(config.item_min_width + 2.0 * config.file_padding);
        let item_width = width - 2.0 * config.file_padding;

        let mut cursor = config.header_height + config.file_padding;
        let mut items = Vec::with_capacity(symbols.len());
        for (name, record) in symbols {
            let methods = record.method_names();
            let kind = if record.is_class() {
                ItemKind::Class
            } else {
                ItemKind::Function
            };
            let height = match kind {
                ItemKind::Class => {
                    config.item_min_height + methods.len() as f32 * config.method_line_height
                }
                ItemKind::Function => config.item_min_height,
            };

            items.push(ItemBox {
                id: ItemId::new(id, name),
                name: name.clone(),
                kind,
                args: record.args.clone(),
                methods,
                is_api_endpoint: record.is_api_endpoint,
                start_line: record.start_line,
                end_line: record.end_line,
                file_id: id,
                file_path: path.to_string(),
                module_key: module_key.clone(),
                position: Vec2::new(config.file_padding, cursor),
                size: Vec2::new(item_width, height),
                references: Vec::new(),
            });
            cursor += height + config.item_gap;
        }

        let content_bottom = if items.is_empty() {
            cursor
        } else {
            cursor - config.item_gap
        };
        let height = (content_bottom + config.file_padding).max(config.min_file_height);

        FileBox {
            id,
            path: path.to_string(),
            module_key,
            display_name: display_name(path),
            is_router: meta.is_some_and(|m| m.is_router),
            grid: GridCell::ORIGIN,
            position: Vec2::ZERO,
            size: Vec2::new(width, height),
            items,
        }
    }
}
