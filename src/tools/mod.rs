//! Queries and edits driven by a line drawn across the outline.

pub mod knife;
pub mod measure;

pub use knife::{Hit, KnifeLine};
pub use measure::Measurement;
