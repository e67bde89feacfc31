//! # Code Canvas Composer
//!
//! Produces the single executable preview document from the three source
//! buffers by textual substitution: the CSS text replaces the first
//! occurrence of the CSS placeholder in the HTML, then the JS text
//! replaces the first occurrence of the JS placeholder in the result.
//!
//! There is no parsing. A placeholder missing from the HTML simply means
//! that source is not included in the output.

mod compose;

pub use compose::{compose, compose_buffers, compose_sources, Composition, Placeholders, Sources};
