use std::fs;
use std::io::Read;
use std::path::Path as FilePath;

use svg::node::element::tag;
use svg::node::Attributes;
use svg::parser::{Event, Parser};

use crate::color::parse_color;
use crate::diagnostic::{Diagnostic, Diagnostics, LogDiagnostics};
use crate::error::{Error, Result};
use crate::number::{parse_length, parse_number, parse_number_list};
use crate::path::parse_path_data;
use crate::style::{FillRule, Style};
use crate::tag::{Document, Element, ElementParent, Ellipse, Group, Line, Path, Polygon, Polyline, Rectangle};
use crate::types::{Point, Rect, Size};

///Containers whose contents are never drawn directly.
const SKIPPED_CONTAINERS: &[&str] = &[
    "defs",
    "clipPath",
    "mask",
    "symbol",
    "pattern",
    "marker",
    "linearGradient",
    "radialGradient",
    "filter",
    "text",
    "svg",
];

///Elements consumed without producing anything or being reported.
const SILENT_ELEMENTS: &[&str] = &["desc", "metadata"];

fn is_ignored_attribute(name: &str) -> bool {
    name == "id" || name == "class" || name == "version" || name.starts_with("xmlns")
}

///Attributes sorted by name, so diagnostics come out in a stable order.
fn sorted(attributes: &Attributes) -> Vec<(&str, &str)> {
    let mut result: Vec<(&str, &str)> = attributes
	.iter()
	.map(|(name, value)| (name.as_str(), &**value))
	.collect();
    result.sort();
    result
}

const PREDEFINED_ENTITIES: &[(&str, &str)] = &[
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&apos;", "'"),
    // last, so `&amp;lt;` stays `&lt;`
    ("&amp;", "&"),
];

///Replaces the predefined XML entities in character data.
fn decode_entities(text: &str) -> String {
    PREDEFINED_ENTITIES
	.iter()
	.fold(String::from(text), |text, &(entity, replacement)| text.replace(entity, replacement))
}

fn parse_points(value: &str) -> Result<Vec<Point>> {
    let numbers = parse_number_list(value)?;
    if numbers.len() % 2 != 0 {
	return Err(Error::InvalidNumber(String::from(value)));
    }

    Ok(numbers.chunks(2).map(|pair| Point::new(pair[0], pair[1])).collect())
}

fn parse_view_box(value: &str) -> Result<Rect> {
    match parse_number_list(value)?.as_slice() {
	&[x, y, width, height] => Ok(Rect::new(x, y, width, height)),
	_ => Err(Error::InvalidNumber(String::from(value))),
    }
}

///SVG's rounded corner rules: a missing radius copies the other one, and
///neither may exceed half the rectangle.
fn corner_radii(frame: &Rect, rx: Option<f64>, ry: Option<f64>) -> (f64, f64) {
    let (rx, ry) = match (rx, ry) {
	(Some(rx), Some(ry)) => (rx, ry),
	(Some(r), None) | (None, Some(r)) => (r, r),
	(None, None) => (0.0, 0.0),
    };

    (
	rx.max(0.0).min(frame.width / 2.0),
	ry.max(0.0).min(frame.height / 2.0),
    )
}

///What an open tag turned into, kept until its closing tag.
enum Frame {
    Document(Document),
    Group(Group),
    Title,
    ///A leaf shape or an element that contributes nothing itself.
    Passive,
    Skipped,
}

struct Open<'l> {
    name: &'l str,
    frame: Frame,
}

///Streaming SVG parser building a [`Document`].
///
///Ignored input (unknown elements, attributes and style properties) is
///reported to the diagnostics sink; any malformed value aborts the parse.
pub struct DocumentParser<'d> {
    diagnostics: &'d mut dyn Diagnostics,
}

impl<'d> DocumentParser<'d> {
    pub fn new(diagnostics: &'d mut dyn Diagnostics) -> Self {
	DocumentParser { diagnostics }
    }

    pub fn parse_str(&mut self, content: &str) -> Result<Document> {
	let document = Scan {
	    diagnostics: &mut *self.diagnostics,
	    open: Vec::new(),
	    finished: None,
	}
	.run(content)?;

	tracing::debug!(
	    title = %document.title,
	    children = document.children.len(),
	    "parsed svg document"
	);
	Ok(document)
    }

    pub fn parse_bytes(&mut self, bytes: &[u8]) -> Result<Document> {
	let content = std::str::from_utf8(bytes).map_err(|err| Error::Markup(err.to_string()))?;
	self.parse_str(content)
    }

    pub fn parse_reader<R: Read>(&mut self, mut reader: R) -> Result<Document> {
	let mut content = Vec::new();
	reader.read_to_end(&mut content)?;
	self.parse_bytes(&content)
    }

    ///Parses a file, titling the document after the file stem when it has
    ///no `<title>` of its own.
    pub fn parse_file<P: AsRef<FilePath>>(&mut self, path: P) -> Result<Document> {
	let path = path.as_ref();
	let content = fs::read(path)?;
	let mut document = self.parse_bytes(&content)?;

	if document.title.is_empty() {
	    if let Some(stem) = path.file_stem() {
		document.title = stem.to_string_lossy().into_owned();
	    }
	}

	Ok(document)
    }
}

pub fn parse_str(content: &str) -> Result<Document> {
    DocumentParser::new(&mut LogDiagnostics).parse_str(content)
}

pub fn parse_bytes(bytes: &[u8]) -> Result<Document> {
    DocumentParser::new(&mut LogDiagnostics).parse_bytes(bytes)
}

pub fn parse_reader<R: Read>(reader: R) -> Result<Document> {
    DocumentParser::new(&mut LogDiagnostics).parse_reader(reader)
}

pub fn parse_file<P: AsRef<FilePath>>(path: P) -> Result<Document> {
    DocumentParser::new(&mut LogDiagnostics).parse_file(path)
}

struct Scan<'a, 'l> {
    diagnostics: &'a mut dyn Diagnostics,
    open: Vec<Open<'l>>,
    finished: Option<Document>,
}

impl<'a, 'l> Scan<'a, 'l> {
    fn run(mut self, content: &'l str) -> Result<Document> {
	for event in Parser::new(content) {
	    match event {
		Event::Error(err) => return Err(Error::Markup(err.to_string())),
		Event::Tag(name, tag::Type::Start, attributes) => {
		    let frame = self.open_tag(name, &attributes)?;
		    self.open.push(Open { name, frame });
		}
		Event::Tag(name, tag::Type::Empty, attributes) => {
		    let frame = self.open_tag(name, &attributes)?;
		    self.close_tag(Open { name, frame })?;
		}
		Event::Tag(name, tag::Type::End, _) => {
		    let open = self.open.pop().ok_or_else(|| {
			Error::Markup(format!("closing tag </{}> without an open tag", name))
		    })?;
		    if open.name != name {
			return Err(Error::Markup(format!(
			    "closing tag </{}> does not match <{}>",
			    name, open.name
			)));
		    }
		    self.close_tag(open)?;
		}
		Event::Text(text) => self.text(text),
		_ => (),
	    }
	}

	if let Some(open) = self.open.last() {
	    return Err(Error::Markup(format!("unclosed tag <{}>", open.name)));
	}

	self.finished
	    .ok_or_else(|| Error::Markup(String::from("no <svg> root element")))
    }

    fn report(&mut self, diagnostic: Diagnostic) {
	self.diagnostics.report(diagnostic);
    }

    fn unknown_attribute(&mut self, element: &str, name: &str, value: &str) {
	if is_ignored_attribute(name) {
	    return;
	}

	self.report(Diagnostic::UnknownAttribute {
	    element: String::from(element),
	    name: String::from(name),
	    value: String::from(value),
	});
    }

    ///Innermost open document or group.
    fn parent(&mut self) -> Result<&mut dyn ElementParent> {
	for open in self.open.iter_mut().rev() {
	    match &mut open.frame {
		Frame::Document(document) => return Ok(document as &mut dyn ElementParent),
		Frame::Group(group) => return Ok(group as &mut dyn ElementParent),
		_ => (),
	    }
	}

	Err(Error::Markup(String::from("element outside of the <svg> root")))
    }

    fn open_tag(&mut self, name: &str, attributes: &Attributes) -> Result<Frame> {
	if self.open.is_empty() {
	    if self.finished.is_some() {
		return Err(Error::Markup(format!("<{}> after the root element", name)));
	    }
	    if name != "svg" {
		return Err(Error::Markup(format!("expected an <svg> root element, found <{}>", name)));
	    }
	    return Ok(Frame::Document(self.document(attributes)?));
	}

	if self.open.iter().any(|open| matches!(open.frame, Frame::Skipped)) {
	    return Ok(Frame::Skipped);
	}

	tracing::trace!(element = name, "open");

	let element = match name {
	    "g" => {
		let own = self.group_style(attributes)?;
		let style = self.parent()?.resolve(&own);
		return Ok(Frame::Group(Group {
		    children: Vec::new(),
		    style,
		}));
	    }
	    "rect" => Element::Rectangle(self.rectangle(attributes)?),
	    "circle" => Element::Ellipse(self.circle(attributes)?),
	    "ellipse" => Element::Ellipse(self.ellipse(attributes)?),
	    "line" => Element::Line(self.line(attributes)?),
	    "polygon" => {
		let (points, style) = self.poly(name, attributes)?;
		Element::Polygon(Polygon { points, style })
	    }
	    "polyline" => {
		let (points, style) = self.poly(name, attributes)?;
		Element::Polyline(Polyline { points, style })
	    }
	    "path" => Element::Path(self.path(attributes)?),
	    "title" => return Ok(Frame::Title),
	    _ if SILENT_ELEMENTS.contains(&name) => return Ok(Frame::Passive),
	    _ if SKIPPED_CONTAINERS.contains(&name) => {
		self.report(Diagnostic::SkippedSubtree(String::from(name)));
		return Ok(Frame::Skipped);
	    }
	    _ => {
		self.report(Diagnostic::UnknownElement(String::from(name)));
		return Ok(Frame::Passive);
	    }
	};

	self.parent()?.append(element);
	Ok(Frame::Passive)
    }

    fn close_tag(&mut self, open: Open<'l>) -> Result<()> {
	match open.frame {
	    Frame::Document(document) => self.finished = Some(document),
	    Frame::Group(group) => {
		// already resolved against its parent when opened
		self.parent()?.children_mut().push(Element::Group(group));
	    }
	    Frame::Title | Frame::Passive | Frame::Skipped => (),
	}

	Ok(())
    }

    ///Only a `<title>` directly under the root names the document.
    fn text(&mut self, text: &str) {
	let document = match self.open.as_mut_slice() {
	    [Open {
		frame: Frame::Document(document),
		..
	    }, Open {
		frame: Frame::Title, ..
	    }] => document,
	    _ => return,
	};

	let text = decode_entities(text.trim());
	if document.title.is_empty() && !text.is_empty() {
	    document.title = text;
	}
    }

    ///Shared handling of style capable attributes.
    ///
    ///Shorthand attributes are merged underneath what is already there, and
    ///`style=` on top, so inline declarations win regardless of attribute
    ///order. Returns false for attributes that are not style related.
    fn style_attribute(&mut self, style: &mut Style, name: &str, value: &str) -> Result<bool> {
	let shorthand = match name {
	    "fill" => Style {
		fill: Some(parse_color(value)?),
		..Style::new()
	    },
	    "stroke" => Style {
		stroke: Some(parse_color(value)?),
		..Style::new()
	    },
	    "stroke-width" => Style {
		stroke_width: Some(parse_length(value)?),
		..Style::new()
	    },
	    "fill-rule" => Style {
		fill_rule: Some(FillRule::parse(value)),
		..Style::new()
	    },
	    "fill-opacity" => Style {
		fill_opacity: Some(parse_number(value)?),
		..Style::new()
	    },
	    "stroke-opacity" => Style {
		stroke_opacity: Some(parse_number(value)?),
		..Style::new()
	    },
	    "opacity" => Style {
		opacity: Some(parse_number(value)?),
		..Style::new()
	    },
	    "style" => {
		let definition = Style::parse_with(value, &mut *self.diagnostics)?;
		*style = style.merge(&definition);
		return Ok(true);
	    }
	    _ => return Ok(false),
	};

	*style = shorthand.merge(style);
	Ok(true)
    }

    fn document(&mut self, attributes: &Attributes) -> Result<Document> {
	let mut width = None;
	let mut height = None;
	let mut view_box = None;
	let mut style = Style::new();

	for (name, value) in sorted(attributes) {
	    match name {
		"width" => width = Some(parse_length(value)?),
		"height" => height = Some(parse_length(value)?),
		"viewBox" => view_box = Some(parse_view_box(value)?),
		_ => {
		    if !self.style_attribute(&mut style, name, value)? {
			self.unknown_attribute("svg", name, value);
		    }
		}
	    }
	}

	let (size, view_box) = match view_box {
	    Some(view_box) => (
		Size::new(
		    width.unwrap_or(view_box.width),
		    height.unwrap_or(view_box.height),
		),
		view_box,
	    ),
	    None => {
		let size = Size::new(width.unwrap_or(0.0), height.unwrap_or(0.0));
		(size, Rect::from_origin_size(Point::ZERO, size))
	    }
	};

	let mut document = Document::new(size, view_box);
	document.style = style;
	Ok(document)
    }

    fn group_style(&mut self, attributes: &Attributes) -> Result<Style> {
	let mut style = Style::new();

	for (name, value) in sorted(attributes) {
	    if !self.style_attribute(&mut style, name, value)? {
		self.unknown_attribute("g", name, value);
	    }
	}

	Ok(style)
    }

    fn rectangle(&mut self, attributes: &Attributes) -> Result<Rectangle> {
	let mut frame = Rect::default();
	let mut rx = None;
	let mut ry = None;
	let mut style = Style::new();

	for (name, value) in sorted(attributes) {
	    match name {
		"x" => frame.x = parse_length(value)?,
		"y" => frame.y = parse_length(value)?,
		"width" => frame.width = parse_length(value)?,
		"height" => frame.height = parse_length(value)?,
		"rx" => rx = Some(parse_length(value)?),
		"ry" => ry = Some(parse_length(value)?),
		_ => {
		    if !self.style_attribute(&mut style, name, value)? {
			self.unknown_attribute("rect", name, value);
		    }
		}
	    }
	}

	let (radius_x, radius_y) = corner_radii(&frame, rx, ry);
	Ok(Rectangle {
	    frame,
	    radius_x,
	    radius_y,
	    style,
	})
    }

    fn circle(&mut self, attributes: &Attributes) -> Result<Ellipse> {
	let mut ellipse = Ellipse::default();

	for (name, value) in sorted(attributes) {
	    match name {
		"cx" => ellipse.center.x = parse_length(value)?,
		"cy" => ellipse.center.y = parse_length(value)?,
		"r" => {
		    let r = parse_length(value)?;
		    ellipse.radius = Size::new(r, r);
		}
		_ => {
		    if !self.style_attribute(&mut ellipse.style, name, value)? {
			self.unknown_attribute("circle", name, value);
		    }
		}
	    }
	}

	Ok(ellipse)
    }

    fn ellipse(&mut self, attributes: &Attributes) -> Result<Ellipse> {
	let mut ellipse = Ellipse::default();

	for (name, value) in sorted(attributes) {
	    match name {
		"cx" => ellipse.center.x = parse_length(value)?,
		"cy" => ellipse.center.y = parse_length(value)?,
		"rx" => ellipse.radius.width = parse_length(value)?,
		"ry" => ellipse.radius.height = parse_length(value)?,
		_ => {
		    if !self.style_attribute(&mut ellipse.style, name, value)? {
			self.unknown_attribute("ellipse", name, value);
		    }
		}
	    }
	}

	Ok(ellipse)
    }

    fn line(&mut self, attributes: &Attributes) -> Result<Line> {
	let mut line = Line::default();

	for (name, value) in sorted(attributes) {
	    match name {
		"x1" => line.start.x = parse_length(value)?,
		"y1" => line.start.y = parse_length(value)?,
		"x2" => line.end.x = parse_length(value)?,
		"y2" => line.end.y = parse_length(value)?,
		_ => {
		    if !self.style_attribute(&mut line.style, name, value)? {
			self.unknown_attribute("line", name, value);
		    }
		}
	    }
	}

	Ok(line)
    }

    fn poly(&mut self, element: &str, attributes: &Attributes) -> Result<(Vec<Point>, Style)> {
	let mut points = Vec::new();
	let mut style = Style::new();

	for (name, value) in sorted(attributes) {
	    if name == "points" {
		points = parse_points(value)?;
	    } else if !self.style_attribute(&mut style, name, value)? {
		self.unknown_attribute(element, name, value);
	    }
	}

	Ok((points, style))
    }

    fn path(&mut self, attributes: &Attributes) -> Result<Path> {
	let mut path = Path::default();

	for (name, value) in sorted(attributes) {
	    if name == "d" {
		path.commands = parse_path_data(value)?;
	    } else if !self.style_attribute(&mut path.style, name, value)? {
		self.unknown_attribute("path", name, value);
	    }
	}

	Ok(path)
    }
}
