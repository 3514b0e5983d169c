//! Reading form descriptions and initial values, writing submitted values.

mod format;
mod input;
mod output;

pub use format::DocumentFormat;
pub use input::{load_form_spec, parse_document_str, read_document};
pub use output::{OutputDestination, OutputOptions, emit, render_value};
