//! Geometry primitives carried by message payloads.
//!
//! Map-space values use `f64` mercator coordinates; screen-space sizes use `f32`.

mod point;
mod rect;

pub use point::{PointD, PointF};
pub use rect::RectD;
