//! Android UI dump (`uiautomator dump`) decoding and querying
//!
//! This module provides:
//! - `bounds`: `[x1,y1][x2,y2]` rectangle parsing
//! - `hierarchy`: Decoding of the dump into `Hierarchy` / `Node` trees
//! - `find`: Depth-first walking and predicate search

mod bounds;
mod find;
mod hierarchy;

pub use bounds::{parse_bounds, Rect};
pub use find::{find_all_in, walk};
pub use hierarchy::{Hierarchy, Node};
