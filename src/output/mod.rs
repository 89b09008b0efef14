//! Output formatting module

pub mod formatter;
pub mod table;

pub use formatter::{Alignment, BorderFormat, BorderStyle, FormatOptions};
pub use table::render;
