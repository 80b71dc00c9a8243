use crate::builder::CodeGraph;
use crate::config::LayoutConfig;
use crate::geometry::{AnchorSide, GridCell, Vec2, lateral_offset, route_path};
use crate::model::{
    CanvasBounds, ConnectionPlan, DiagramLayout, EndpointAnchor, FileBox, ItemBox,
    PositionOverrides,
};
use crate::placement::GridPlacement;
use codemap_core::ConnectionId;

/// Converts grid cells and box contents into absolute pixel geometry.
pub struct Materializer<'a> {
    config: &'a LayoutConfig,
}

impl<'a> Materializer<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self { config }
    }

    pub fn materialize(
        &self,
        graph: &CodeGraph,
        placement: &GridPlacement,
        overrides: &PositionOverrides,
    ) -> DiagramLayout {
        let stride = self.stride(&graph.files);

        let mut file_boxes = graph.files.clone();
        for file in &mut file_boxes {
            let cell = placement.cell(file.id).unwrap_or_default();
            file.grid = cell;
            file.position = self.grid_to_pixel(cell, stride);
        }
        apply_position_overrides(&mut file_boxes, overrides);

        let connections = self.plan_connections(graph, &file_boxes);
        let canvas_bounds = self.canvas_bounds(&file_boxes);

        DiagramLayout {
            file_boxes,
            connections,
            canvas_bounds,
        }
    }

    /// Uniform column/row pitch derived from the largest file box.
    pub fn stride(&self, files: &[FileBox]) -> Vec2 {
        let max_width = files
            .iter()
            .map(|f| f.size.x)
            .fold(self.config.min_file_width, f32::max);
        let max_height = files
            .iter()
            .map(|f| f.size.y)
            .fold(self.config.min_file_height, f32::max);
        Vec2::new(
            max_width + self.config.column_spacing,
            max_height + self.config.row_spacing,
        )
    }

    pub fn grid_to_pixel(&self, cell: GridCell, stride: Vec2) -> Vec2 {
        let margin = self.config.canvas_margin;
        Vec2::new(
            margin + cell.x as f32 * stride.x,
            margin + cell.y as f32 * stride.y,
        )
    }

    pub fn canvas_bounds(&self, files: &[FileBox]) -> CanvasBounds {
        let right = files
            .iter()
            .map(|f| f.position.x + f.size.x)
            .fold(0.0, f32::max);
        let bottom = files
            .iter()
            .map(|f| f.position.y + f.size.y)
            .fold(0.0, f32::max);
        CanvasBounds {
            width: (right + self.config.canvas_margin).max(self.config.min_canvas_width),
            height: (bottom + self.config.canvas_margin).max(self.config.min_canvas_height),
        }
    }

    fn plan_connections(&self, graph: &CodeGraph, files: &[FileBox]) -> Vec<ConnectionPlan> {
        let style = self.config.path_style();
        let mut plans = Vec::with_capacity(graph.pending.len());

        for pending in &graph.pending {
            let (Some(source_file), Some(target_file)) =
                (files.get(pending.source.file.0), files.get(pending.target.file.0))
            else {
                continue;
            };
            let (Some(source_item), Some(target_item)) = (
                source_file.item(pending.source.index),
                target_file.item(pending.target.index),
            ) else {
                continue;
            };

            let (source_side, target_side) = if target_file.position.x < source_file.position.x {
                (AnchorSide::Left, AnchorSide::Right)
            } else {
                (AnchorSide::Right, AnchorSide::Left)
            };

            let start = anchor_point(source_file, source_item, source_side);
            let end = anchor_point(target_file, target_item, target_side);
            let offset = lateral_offset(pending.occurrence, self.config.offset_step);

            plans.push(ConnectionPlan {
                id: ConnectionId::new(&source_item.id, &target_item.id, pending.occurrence),
                source: endpoint(source_file, source_item, start, source_side),
                target: endpoint(target_file, target_item, end, target_side),
                label: pending.label(),
                occurrence: pending.occurrence,
                offset,
                path: route_path(start, source_side, end, target_side, offset, style),
            });
        }

        plans
    }
}

/// Replace computed positions with user overrides. Idempotent; item offsets are untouched.
pub fn apply_position_overrides(files: &mut [FileBox], overrides: &PositionOverrides) {
    if overrides.is_empty() {
        return;
    }
    for file in files {
        if let Some(position) = overrides.get(&file.path) {
            file.position = position;
        }
    }
}

/// Vertical center of the item on the given edge, in absolute coordinates.
fn anchor_point(file: &FileBox, item: &ItemBox, side: AnchorSide) -> Vec2 {
    let rect = item.rect_at(file.position);
    let x = match side {
        AnchorSide::Left => rect.min.x,
        AnchorSide::Right => rect.max.x,
    };
    Vec2::new(x, rect.center().y)
}

fn endpoint(file: &FileBox, item: &ItemBox, point: Vec2, side: AnchorSide) -> EndpointAnchor {
    EndpointAnchor {
        file_id: file.id,
        file_path: file.path.clone(),
        item_id: item.id.clone(),
        position: item.position,
        size: item.size,
        point,
        side,
    }
}
