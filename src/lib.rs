//! The outline editing core of the runebender font editor.
//!
//! A glyph's [`Outline`] is a list of [`Path`]s, each a sequence of
//! on-curve and off-curve points. Edits keep the outline well formed: cubic
//! segments always have both control points, and smooth points keep their
//! handles collinear as things are dragged around.

#[macro_use]
extern crate serde_derive;

mod selection;
mod topology;

pub mod clipboard;
pub mod consts;
pub mod design_space;
pub mod error;
pub mod geom;
pub mod motion;
pub mod outline;
pub mod path;
pub mod point;
pub mod tools;

pub use design_space::{DPoint, DVec2};
pub use error::{EditError, Result};
pub use motion::MovePolicy;
pub use outline::{Outline, OverlapRemover};
pub use path::{Path, Segment};
pub use point::{PathPoint, PointType};
pub use selection::Filtered;
