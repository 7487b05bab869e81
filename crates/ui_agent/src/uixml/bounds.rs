//! Bounds rectangle parsing for `[x1,y1][x2,y2]` strings

use crate::error::{AdbError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    // ASCII digits only; `\d` would also accept other Unicode decimal digits.
    static ref BOUNDS_RE: Regex = Regex::new(r"\[([0-9]+),([0-9]+)\]\[([0-9]+),([0-9]+)\]")
        .expect("bounds pattern is valid");
}

/// Bounding box of a UI element in screen pixels
///
/// `(x1, y1)` is the top-left corner and `(x2, y2)` the bottom-right one.
/// The origin is the top-left of the screen. No ordering between the corners
/// is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Rect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Rect {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    /// Center point using truncating division, biased toward the top-left
    pub fn center(&self) -> (i32, i32) {
        (self.x1 + self.width() / 2, self.y1 + self.height() / 2)
    }
}

/// Parse the first `[x1,y1][x2,y2]` occurrence in `bounds`
pub fn parse_bounds(bounds: &str) -> Result<Rect> {
    let caps = BOUNDS_RE
        .captures(bounds)
        .ok_or_else(|| AdbError::MalformedBounds(bounds.to_string()))?;

    let coord = |i: usize| -> Result<i32> {
        caps[i]
            .parse::<i32>()
            .map_err(|_| AdbError::MalformedBounds(bounds.to_string()))
    };

    Ok(Rect {
        x1: coord(1)?,
        y1: coord(2)?,
        x2: coord(3)?,
        y2: coord(4)?,
    })
}
