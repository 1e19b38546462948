//! Text transformations with reversible locality mapping.
//!
//! A [`TextTransformation`] is the expanded view of a document: copybook
//! documents are spliced in place of copy statements (`extend`) and text is
//! substituted (`replace`), with every edit addressed in the coordinates of
//! the document it targets. The expanded text and a reverse mapping from
//! expanded offsets to source [`Locality`](cbl_ir::Locality) values are
//! derived from it on demand.

mod error;
mod mapping;
mod transformation;

pub use error::{InvalidReason, TransformError};
pub use mapping::LocalityMap;
pub use transformation::TextTransformation;
