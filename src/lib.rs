//! Turns SVG icons into Rust source that draws them with `tiny-skia`.
//!
//! The generated accessor renders on first use and keeps one `Pixmap` per
//! requested size and tint in a process wide cache.

pub mod codegen;
pub mod error;
pub mod literal;
pub mod naming;
pub mod options;

pub use codegen::{generate, output_file_name, render};
pub use error::{CodegenError, Error, Result};
pub use naming::Name;
pub use options::{Options, Visibility};

///Parses `text` and renders its accessor.
///
///`title_fallback` names the accessor when the document has no `<title>`,
///usually the stem of the file it came from.
pub fn convert(text: &str, title_fallback: &str, options: &Options) -> Result<String> {
    let mut document = svgr::parse_str(text)?;
    if document.title.is_empty() {
	document.title = String::from(title_fallback);
    }

    tracing::debug!(title = %document.title, "converting document");
    Ok(render(&document, options)?)
}
