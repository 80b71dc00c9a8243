use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector rotated a quarter turn, or zero for a degenerate vector.
    pub fn unit_perpendicular(&self) -> Vec2 {
        let len = self.length();
        if len < f32::EPSILON {
            return Vec2::ZERO;
        }
        Vec2::new(-self.y / len, self.x / len)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// A rectangle defined by min and max corners
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Create a new rectangle from position and size
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: Vec2::new(pos.x + size.x, pos.y + size.y),
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.min.x + self.width() * 0.5,
            self.min.y + self.height() * 0.5,
        )
    }
}

/// Integer slot on the placement lattice. `y` grows downwards (south).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

impl GridCell {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn chebyshev_distance(&self, other: GridCell) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

/// W, E, N, S, NW, NE, SW, SE
pub const RING_DIRECTIONS: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
];

/// Endless expanding-ring slot enumeration around a center, starting at radius 1.
///
/// Each ring visits exactly the eight compass/diagonal cells at that radius in
/// [`RING_DIRECTIONS`] order.
#[derive(Debug, Clone)]
pub struct RingSlots {
    center: GridCell,
    radius: i32,
    direction: usize,
}

impl RingSlots {
    pub fn around(center: GridCell) -> Self {
        Self {
            center,
            radius: 1,
            direction: 0,
        }
    }

    pub fn next_cell(&mut self) -> GridCell {
        let (dx, dy) = RING_DIRECTIONS[self.direction];
        let cell = self.center.offset(dx * self.radius, dy * self.radius);
        self.direction += 1;
        if self.direction == RING_DIRECTIONS.len() {
            self.direction = 0;
            self.radius += 1;
        }
        cell
    }
}

impl Iterator for RingSlots {
    type Item = GridCell;

    fn next(&mut self) -> Option<GridCell> {
        Some(self.next_cell())
    }
}

/// Lateral fan-out for the n-th parallel edge: 0, +s, -s, +2s, -2s, ...
pub fn lateral_offset(occurrence: usize, step: f32) -> f32 {
    if occurrence == 0 {
        return 0.0;
    }
    let magnitude = occurrence.div_ceil(2) as f32 * step;
    if occurrence % 2 == 1 {
        magnitude
    } else {
        -magnitude
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorSide {
    Left,
    Right,
}

impl AnchorSide {
    /// Horizontal direction pointing away from the box on this side.
    pub fn outward(&self) -> f32 {
        match self {
            AnchorSide::Left => -1.0,
            AnchorSide::Right => 1.0,
        }
    }
}

/// A cubic bezier curve segment defined by four control points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub start: Vec2,
    pub control1: Vec2,
    pub control2: Vec2,
    pub end: Vec2,
}

impl CubicBezier {
    /// Sample the curve at parameter t [0, 1]
    pub fn sample(&self, t: f32) -> Vec2 {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        let x = self.start.x * mt3
            + 3.0 * self.control1.x * mt2 * t
            + 3.0 * self.control2.x * mt * t2
            + self.end.x * t3;
        let y = self.start.y * mt3
            + 3.0 * self.control1.y * mt2 * t
            + 3.0 * self.control2.y * mt * t2
            + self.end.y * t3;

        Vec2::new(x, y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EdgePath {
    Line { start: Vec2, end: Vec2 },
    Cubic(CubicBezier),
}

impl EdgePath {
    pub fn start(&self) -> Vec2 {
        match self {
            EdgePath::Line { start, .. } => *start,
            EdgePath::Cubic(curve) => curve.start,
        }
    }

    pub fn end(&self) -> Vec2 {
        match self {
            EdgePath::Line { end, .. } => *end,
            EdgePath::Cubic(curve) => curve.end,
        }
    }

    pub fn sample(&self, t: f32) -> Vec2 {
        match self {
            EdgePath::Line { start, end } => *start + (*end - *start) * t,
            EdgePath::Cubic(curve) => curve.sample(t),
        }
    }

    /// SVG `d` attribute for this path.
    pub fn to_svg_path(&self) -> String {
        match self {
            EdgePath::Line { start, end } => {
                format!("M {} {} L {} {}", start.x, start.y, end.x, end.y)
            }
            EdgePath::Cubic(c) => format!(
                "M {} {} C {} {}, {} {}, {} {}",
                c.start.x,
                c.start.y,
                c.control1.x,
                c.control1.y,
                c.control2.x,
                c.control2.y,
                c.end.x,
                c.end.y
            ),
        }
    }
}

/// Shape constraints for [`route_path`].
#[derive(Debug, Clone, Copy)]
pub struct PathStyle {
    /// Below this horizontal distance the path is a straight segment.
    pub straight_threshold: f32,
    /// Upper bound on how far control points leave their endpoint.
    pub max_control_distance: f32,
}

/// Build the path between two anchors.
///
/// Control points leave each endpoint horizontally, away from its box, by half the
/// horizontal distance (capped). The lateral offset shifts both control points
/// perpendicular to the chord so fanned-out parallel curves stay apart.
pub fn route_path(
    start: Vec2,
    start_side: AnchorSide,
    end: Vec2,
    end_side: AnchorSide,
    lateral: f32,
    style: PathStyle,
) -> EdgePath {
    let dx = (end.x - start.x).abs();
    if dx < style.straight_threshold {
        return EdgePath::Line { start, end };
    }

    let reach = (dx * 0.5).min(style.max_control_distance);
    let shift = (end - start).unit_perpendicular() * lateral;

    let control1 = start + Vec2::new(start_side.outward() * reach, 0.0) + shift;
    let control2 = end + Vec2::new(end_side.outward() * reach, 0.0) + shift;

    EdgePath::Cubic(CubicBezier {
        start,
        control1,
        control2,
        end,
    })
}
