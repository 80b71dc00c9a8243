use crate::builder::{CodeGraph, GraphBuilder};
use crate::config::LayoutConfig;
use crate::highlight::HighlightIndex;
use crate::materializer::Materializer;
use crate::model::{DiagramLayout, PositionOverrides};
use crate::placement::{GridPlacement, GridPlacer};
use codemap_core::Document;

/// Everything one layout pass produces.
#[derive(Debug, Clone)]
pub struct LayoutOutput {
    pub graph: CodeGraph,
    pub placement: GridPlacement,
    pub layout: DiagramLayout,
    pub highlight: HighlightIndex,
}

/// Runs build, placement, materialization and highlight indexing in sequence.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn build_graph(&self, document: &Document) -> CodeGraph {
        GraphBuilder::new(&self.config).build(document)
    }

    pub fn place(&self, graph: &CodeGraph) -> GridPlacement {
        GridPlacer::from_config(&self.config).place(graph)
    }

    pub fn layout(&self, document: &Document, overrides: &PositionOverrides) -> LayoutOutput {
        let graph = self.build_graph(document);
        let placement = self.place(&graph);
        let layout = Materializer::new(&self.config).materialize(&graph, &placement, overrides);
        let highlight = HighlightIndex::build(&layout.connections);

        tracing::debug!(
            "Laid out {} files with {} connections on a {}x{} canvas",
            layout.file_boxes.len(),
            layout.connections.len(),
            layout.canvas_bounds.width,
            layout.canvas_bounds.height
        );

        LayoutOutput {
            graph,
            placement,
            layout,
            highlight,
        }
    }

    /// Re-materialize with new overrides, reusing the graph and grid placement.
    ///
    /// Connection ids are unchanged, so the highlight index stays valid.
    pub fn apply_overrides(&self, output: &mut LayoutOutput, overrides: &PositionOverrides) {
        output.layout =
            Materializer::new(&self.config).materialize(&output.graph, &output.placement, overrides);
    }
}
