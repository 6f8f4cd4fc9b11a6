use std::fmt;

use crate::path::PathCommand;
use crate::style::Style;
use crate::types::{Point, Rect, Size};

///Stable type tag of an element, used for dispatch and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Document,
    Group,
    Rectangle,
    Ellipse,
    Line,
    Polygon,
    Polyline,
    Path,
}

impl Tag {
    pub fn name(&self) -> &'static str {
	match self {
	    Tag::Document => "svg",
	    Tag::Group => "g",
	    Tag::Rectangle => "rect",
	    Tag::Ellipse => "ellipse",
	    Tag::Line => "line",
	    Tag::Polygon => "polygon",
	    Tag::Polyline => "polyline",
	    Tag::Path => "path",
	}
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
	f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Rectangle {
    pub frame: Rect,
    pub radius_x: f64,
    pub radius_y: f64,
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ellipse {
    pub center: Point,
    pub radius: Size,
    pub style: Style,
}

impl Ellipse {
    ///Bounding box the ellipse is inscribed in.
    pub fn frame(&self) -> Rect {
	Rect::new(
	    self.center.x - self.radius.width,
	    self.center.y - self.radius.height,
	    self.radius.width * 2.0,
	    self.radius.height * 2.0,
	)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Line {
    pub start: Point,
    pub end: Point,
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub points: Vec<Point>,
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polyline {
    pub points: Vec<Point>,
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    pub commands: Vec<PathCommand>,
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    pub children: Vec<Element>,
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Line(Line),
    Polygon(Polygon),
    Polyline(Polyline),
    Path(Path),
    Group(Group),
}

impl Element {
    pub fn tag(&self) -> Tag {
	match self {
	    Element::Rectangle(_) => Tag::Rectangle,
	    Element::Ellipse(_) => Tag::Ellipse,
	    Element::Line(_) => Tag::Line,
	    Element::Polygon(_) => Tag::Polygon,
	    Element::Polyline(_) => Tag::Polyline,
	    Element::Path(_) => Tag::Path,
	    Element::Group(_) => Tag::Group,
	}
    }

    pub fn style(&self) -> &Style {
	match self {
	    Element::Rectangle(e) => &e.style,
	    Element::Ellipse(e) => &e.style,
	    Element::Line(e) => &e.style,
	    Element::Polygon(e) => &e.style,
	    Element::Polyline(e) => &e.style,
	    Element::Path(e) => &e.style,
	    Element::Group(e) => &e.style,
	}
    }

    pub fn style_mut(&mut self) -> &mut Style {
	match self {
	    Element::Rectangle(e) => &mut e.style,
	    Element::Ellipse(e) => &mut e.style,
	    Element::Line(e) => &mut e.style,
	    Element::Polygon(e) => &mut e.style,
	    Element::Polyline(e) => &mut e.style,
	    Element::Path(e) => &mut e.style,
	    Element::Group(e) => &mut e.style,
	}
    }

    ///Whether the element paints anything itself, as opposed to holding
    ///children.
    pub fn is_drawable(&self) -> bool {
	!matches!(self, Element::Group(_))
    }
}

///Elements that own an ordered list of children.
pub trait ElementParent {
    fn style(&self) -> &Style;
    fn children(&self) -> &[Element];
    fn children_mut(&mut self) -> &mut Vec<Element>;

    ///Effective style of a child declaring `own` inside this parent.
    fn resolve(&self, own: &Style) -> Style {
	Style::cascade(self.style(), own)
    }

    ///Resolves the child's declared style against this parent, then attaches
    ///it after the existing children.
    fn append(&mut self, mut child: Element) {
	let resolved = self.resolve(child.style());
	*child.style_mut() = resolved;
	self.children_mut().push(child);
    }
}

impl ElementParent for Group {
    fn style(&self) -> &Style {
	&self.style
    }

    fn children(&self) -> &[Element] {
	&self.children
    }

    fn children_mut(&mut self) -> &mut Vec<Element> {
	&mut self.children
    }
}

///Root of a parsed file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    ///Output pixel dimensions.
    pub size: Size,
    ///User-space rectangle mapped onto `size`.
    pub view_box: Rect,
    pub title: String,
    pub children: Vec<Element>,
    pub style: Style,
}

impl Document {
    pub fn new(size: Size, view_box: Rect) -> Self {
	Document {
	    size,
	    view_box,
	    ..Document::default()
	}
    }

    pub fn tag(&self) -> Tag {
	Tag::Document
    }
}

impl ElementParent for Document {
    fn style(&self) -> &Style {
	&self.style
    }

    fn children(&self) -> &[Element] {
	&self.children
    }

    fn children_mut(&mut self) -> &mut Vec<Element> {
	&mut self.children
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    fn blue() -> Color {
	Color::rgb(0.0, 0.0, 1.0)
    }

    #[test]
    fn append_resolves_against_parent() {
	let mut group = Group {
	    style: Style {
		fill: Some(Color::rgb(1.0, 1.0, 1.0)),
		stroke: Some(Color::rgb(1.0, 0.0, 0.0)),
		stroke_width: Some(5.0),
		..Style::new()
	    },
	    ..Group::default()
	};
	let parent_style = group.style;

	group.append(Element::Ellipse(Ellipse::default()));
	group.append(Element::Ellipse(Ellipse {
	    style: Style {
		fill: Some(blue()),
		..Style::new()
	    },
	    ..Ellipse::default()
	}));

	assert_eq!(group.children[0].style(), &parent_style);
	assert_eq!(
	    group.children[1].style(),
	    &Style {
		fill: Some(blue()),
		..parent_style
	    }
	);
    }

    #[test]
    fn append_fills_in_defaults() {
	let mut document = Document::new(Size::new(10.0, 10.0), Rect::new(0.0, 0.0, 10.0, 10.0));
	document.append(Element::Line(Line::default()));

	assert_eq!(document.children().len(), 1);
	assert_eq!(document.children[0].style(), &Style::defaults());
	assert_eq!(document.children[0].tag(), Tag::Line);
    }

    #[test]
    fn ellipse_frame() {
	let ellipse = Ellipse {
	    center: Point::new(50.0, 50.0),
	    radius: Size::new(30.0, 20.0),
	    ..Ellipse::default()
	};

	assert_eq!(ellipse.frame(), Rect::new(20.0, 30.0, 60.0, 40.0));
    }

    #[test]
    fn tag_names() {
	assert_eq!(Tag::Rectangle.to_string(), "rect");
	assert_eq!(Element::Group(Group::default()).tag().name(), "g");
	assert!(!Element::Group(Group::default()).is_drawable());
	assert!(Element::Path(Path::default()).is_drawable());
    }
}
