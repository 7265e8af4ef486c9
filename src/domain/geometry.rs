use serde::Serialize;

/// A position on the vacuum map, with an optional heading in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a: Option<i32>,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y, a: None }
    }

    pub fn with_angle(x: f64, y: f64, a: i32) -> Self {
        Point { x, y, a: Some(a) }
    }
}

/// A virtual wall segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Wall {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

/// An axis-aligned cleaning zone given by two corners
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Zone {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

/// A quadrilateral restricted area (no-go, no-mop, no-carpet)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Area {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub x3: f64,
    pub y3: f64,
}

/// A travelled or planned path, possibly split into several segments
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Path {
    pub point_length: u32,
    pub point_size: u32,
    pub angle: u32,
    pub paths: Vec<Vec<Point>>,
}

impl Path {
    /// Total number of points across all segments
    pub fn len(&self) -> usize {
        self.paths.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A room bounding box in map coordinates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Room {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub number: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Room {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64, number: u8) -> Self {
        Room {
            x0,
            y0,
            x1,
            y1,
            number,
            name: None,
        }
    }
}
