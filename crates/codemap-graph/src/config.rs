use crate::geometry::PathStyle;
use serde::{Deserialize, Serialize};

/// Geometry constants for the materialized diagram, in pixels.
///
/// Deserializes from partial JSON; missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Interior margin of a file box on all sides
    pub file_padding: f32,
    /// Title row of a file box, above the first item
    pub header_height: f32,
    pub item_min_width: f32,
    pub item_min_height: f32,
    /// Extra height per listed method of a class item
    pub method_line_height: f32,
    /// Vertical gap between stacked items
    pub item_gap: f32,
    pub min_file_width: f32,
    pub min_file_height: f32,
    /// Horizontal gap between grid columns
    pub column_spacing: f32,
    /// Vertical gap between grid rows
    pub row_spacing: f32,
    pub canvas_margin: f32,
    pub min_canvas_width: f32,
    pub min_canvas_height: f32,
    pub straight_threshold: f32,
    pub max_control_distance: f32,
    /// Lateral step between parallel connections of the same item pair
    pub offset_step: f32,
    /// Slots tried around an anchor file before falling back to the origin search
    pub neighbor_slot_limit: usize,
}

impl LayoutConfig {
    pub const DEFAULT_FILE_PADDING: f32 = 16.0;
    pub const DEFAULT_ITEM_GAP: f32 = 10.0;
    pub const DEFAULT_OFFSET_STEP: f32 = 12.0;
    pub const DEFAULT_NEIGHBOR_SLOT_LIMIT: usize = 256;

    pub fn path_style(&self) -> PathStyle {
        PathStyle {
            straight_threshold: self.straight_threshold,
            max_control_distance: self.max_control_distance,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            file_padding: Self::DEFAULT_FILE_PADDING,
            header_height: 36.0,
            item_min_width: 220.0,
            item_min_height: 44.0,
            method_line_height: 18.0,
            item_gap: Self::DEFAULT_ITEM_GAP,
            min_file_width: 260.0,
            min_file_height: 120.0,
            column_spacing: 140.0,
            row_spacing: 100.0,
            canvas_margin: 80.0,
            min_canvas_width: 1200.0,
            min_canvas_height: 800.0,
            straight_threshold: 40.0,
            max_control_distance: 160.0,
            offset_step: Self::DEFAULT_OFFSET_STEP,
            neighbor_slot_limit: Self::DEFAULT_NEIGHBOR_SLOT_LIMIT,
        }
    }
}
