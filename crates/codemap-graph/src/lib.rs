//! Layout engine for code-structure diagrams.
//!
//! A [`Document`](codemap_core::Document) of files and symbols becomes a
//! [`CodeGraph`] (boxes plus resolved references), a [`GridPlacement`] that
//! clusters related files, and finally a [`DiagramLayout`] with absolute
//! geometry and routed connection paths.

pub mod builder;
pub mod config;
pub mod engine;
pub mod geometry;
pub mod highlight;
pub mod materializer;
pub mod model;
pub mod placement;
pub mod resolver;

pub use builder::{BuildStats, CodeGraph, EdgeWeights, GraphBuilder, PendingConnection};
pub use config::LayoutConfig;
pub use engine::{LayoutEngine, LayoutOutput};
pub use geometry::{AnchorSide, CubicBezier, EdgePath, GridCell, Rect, Vec2};
pub use highlight::{HighlightIndex, HighlightSet};
pub use materializer::{Materializer, apply_position_overrides};
pub use model::{
    CanvasBounds, ConnectionPlan, DiagramLayout, EndpointAnchor, FileBox, ItemBox, ItemRef,
    PositionOverrides, ReferenceRecord, ReferenceTarget,
};
pub use placement::{GridPlacement, GridPlacer};
pub use resolver::{MatchStrategy, Resolution, SymbolIndex};
