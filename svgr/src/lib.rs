//! Parser for the drawable subset of SVG.
//!
//! Documents are read into a tree of [`Element`]s whose styles are already
//! resolved against their ancestors, ready for rendering or code generation.

pub mod arc;
pub mod color;
pub mod diagnostic;
pub mod error;
pub mod number;
pub mod parse;
pub mod path;
pub mod style;
pub mod tag;
pub mod types;

pub use color::{parse_color, Color};
pub use diagnostic::{Diagnostic, Diagnostics, LogDiagnostics};
pub use error::{Error, PathSyntaxReason, Result};
pub use parse::{parse_bytes, parse_file, parse_reader, parse_str, DocumentParser};
pub use path::{parse_path_data, PathCommand};
pub use style::{FillRule, Style};
pub use tag::{Document, Element, ElementParent, Ellipse, Group, Line, Path, Polygon, Polyline, Rectangle, Tag};
pub use types::{Point, Rect, Size};
