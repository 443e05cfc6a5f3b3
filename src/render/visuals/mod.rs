//! Fixed-layout diagram routines. Each one draws illustrative data and
//! returns the finished [`Figure`](crate::render::figure::Figure).

pub mod logic;
pub mod matrix;
pub mod pattern;
pub mod sequence;
pub mod spatial;
pub mod venn;

pub use sequence::SequenceKind;

/// Figure title size in points.
pub(crate) const TITLE_SIZE: f32 = 18.0;
/// Panel title size in points.
pub(crate) const PANEL_TITLE_SIZE: f32 = 16.0;
