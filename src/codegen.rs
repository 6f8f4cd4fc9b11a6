use proc_macro2::TokenStream;
use quote::quote;

use svgr::arc::KAPPA;
use svgr::{Document, Element, FillRule, PathCommand, Point, Rect, Style};

use crate::error::CodegenError;
use crate::literal::{color, point, Num};
use crate::naming::Name;
use crate::options::{Options, Visibility};

type Result<T> = std::result::Result<T, CodegenError>;

///Commands tracing a rectangle with elliptic corners, clockwise from the
///end of the top left corner.
fn rounded_rect(frame: &Rect, rx: f64, ry: f64) -> Vec<PathCommand> {
    let (left, top) = (frame.x, frame.y);
    let (right, bottom) = (frame.x + frame.width, frame.y + frame.height);
    let (kx, ky) = (rx * KAPPA, ry * KAPPA);

    let corner = |control_start: Point, control_end: Point, end: Point| PathCommand::CubicCurve {
	control_start,
	control_end,
	end,
    };

    vec![
	PathCommand::MoveTo(Point::new(left + rx, top)),
	PathCommand::LineTo(Point::new(right - rx, top)),
	corner(
	    Point::new(right - rx + kx, top),
	    Point::new(right, top + ry - ky),
	    Point::new(right, top + ry),
	),
	PathCommand::LineTo(Point::new(right, bottom - ry)),
	corner(
	    Point::new(right, bottom - ry + ky),
	    Point::new(right - rx + kx, bottom),
	    Point::new(right - rx, bottom),
	),
	PathCommand::LineTo(Point::new(left + rx, bottom)),
	corner(
	    Point::new(left + rx - kx, bottom),
	    Point::new(left, bottom - ry + ky),
	    Point::new(left, bottom - ry),
	),
	PathCommand::LineTo(Point::new(left, top + ry)),
	corner(
	    Point::new(left, top + ry - ky),
	    Point::new(left + rx - kx, top),
	    Point::new(left + rx, top),
	),
	PathCommand::ClosePath,
    ]
}

fn through_points(points: &[Point], close: bool) -> Vec<PathCommand> {
    let mut commands: Vec<PathCommand> = points
	.iter()
	.enumerate()
	.map(|(i, &p)| if i == 0 { PathCommand::MoveTo(p) } else { PathCommand::LineTo(p) })
	.collect();

    if close && !commands.is_empty() {
	commands.push(PathCommand::ClosePath);
    }
    commands
}

fn command(command: &PathCommand) -> TokenStream {
    match *command {
	PathCommand::MoveTo(to) => {
	    let to = point(to);
	    quote!(builder.move_to(#to);)
	}
	PathCommand::LineTo(to) => {
	    let to = point(to);
	    quote!(builder.line_to(#to);)
	}
	PathCommand::QuadraticCurve { control, end } => {
	    let (control, end) = (point(control), point(end));
	    quote!(builder.quad_to(#control, #end);)
	}
	PathCommand::CubicCurve {
	    control_start,
	    control_end,
	    end,
	} => {
	    let (control_start, control_end, end) = (point(control_start), point(control_end), point(end));
	    quote!(builder.cubic_to(#control_start, #control_end, #end);)
	}
	PathCommand::ClosePath => quote!(builder.close();),
    }
}

///Expression evaluating to an `Option<tiny_skia::Path>`, or nothing when
///there is no geometry to build.
fn path_builder(commands: &[PathCommand]) -> Option<TokenStream> {
    if commands.is_empty() {
	return None;
    }

    let statements = commands.iter().map(command);
    Some(quote! {
	{
	    let mut builder = tiny_skia::PathBuilder::new();
	    #(#statements)*
	    builder.finish()
	}
    })
}

fn xywh(frame: &Rect) -> TokenStream {
    let (x, y, width, height) = (Num(frame.x), Num(frame.y), Num(frame.width), Num(frame.height));
    quote!(tiny_skia::Rect::from_xywh(#x, #y, #width, #height))
}

fn path_expression(element: &Element) -> Option<TokenStream> {
    match element {
	Element::Rectangle(rect) if rect.radius_x > 0.0 && rect.radius_y > 0.0 => {
	    path_builder(&rounded_rect(&rect.frame, rect.radius_x, rect.radius_y))
	}
	Element::Rectangle(rect) => {
	    let rect = xywh(&rect.frame);
	    Some(quote!(#rect.map(tiny_skia::PathBuilder::from_rect)))
	}
	Element::Ellipse(ellipse) => {
	    let frame = xywh(&ellipse.frame());
	    Some(quote!(#frame.and_then(tiny_skia::PathBuilder::from_oval)))
	}
	Element::Line(line) => path_builder(&[PathCommand::MoveTo(line.start), PathCommand::LineTo(line.end)]),
	Element::Polygon(polygon) => path_builder(&through_points(&polygon.points, true)),
	Element::Polyline(polyline) => path_builder(&through_points(&polyline.points, false)),
	Element::Path(path) => path_builder(&path.commands),
	Element::Group(_) => None,
    }
}

fn fill_rule(rule: FillRule) -> TokenStream {
    match rule {
	FillRule::NonZero => quote!(tiny_skia::FillRule::Winding),
	FillRule::EvenOdd => quote!(tiny_skia::FillRule::EvenOdd),
    }
}

///Statements painting `path` with `style`, or the tint when one is given.
fn paint(style: &Style) -> Result<TokenStream> {
    let mut declarations = Vec::new();
    let mut tinted = Vec::new();
    let mut untinted = Vec::new();
    let mut draws = Vec::new();

    if style.has_stroke() {
	let width = Num(style.stroke_width());
	declarations.push(quote! {
	    let stroke = tiny_skia::Stroke { width: #width, ..tiny_skia::Stroke::default() };
	});
    }

    if let Some(fill) = style.fill.filter(|_| style.has_fill()) {
	let fill = color(fill, style.fill_opacity() * style.opacity())?;
	let rule = fill_rule(style.fill_rule());

	declarations.push(quote!(let mut fill_paint = tiny_skia::Paint::default();));
	tinted.push(quote!(fill_paint.set_color(tint);));
	untinted.push(quote!(fill_paint.set_color(#fill);));
	draws.push(quote!(pixmap.fill_path(&path, &fill_paint, #rule, transform, None);));
    }

    if let Some(stroke) = style.stroke.filter(|_| style.has_stroke()) {
	let stroke = color(stroke, style.stroke_opacity() * style.opacity())?;

	declarations.push(quote!(let mut stroke_paint = tiny_skia::Paint::default();));
	tinted.push(quote!(stroke_paint.set_color(tint);));
	untinted.push(quote!(stroke_paint.set_color(#stroke);));
	draws.push(quote!(pixmap.stroke_path(&path, &stroke_paint, &stroke, transform, None);));
    }

    Ok(quote! {
	#(#declarations)*
	if let Some(tint) = tint {
	    #(#tinted)*
	} else {
	    #(#untinted)*
	}
	#(#draws)*
    })
}

///One scoped block drawing `element`, or nothing when it paints nothing.
///
///Groups always produce a block holding their children's blocks.
pub fn element(element: &Element) -> Result<Option<TokenStream>> {
    if let Element::Group(group) = element {
	let children = children(&group.children)?;
	return Ok(Some(quote!({ #(#children)* })));
    }

    let style = element.style();
    if !style.has_fill() && !style.has_stroke() {
	tracing::trace!(element = %element.tag(), "nothing to paint, skipping");
	return Ok(None);
    }

    let path = match path_expression(element) {
	Some(path) => path,
	None => return Ok(None),
    };
    let paint = paint(style)?;

    Ok(Some(quote! {
	{
	    let path = #path;
	    if let Some(path) = path {
		#paint
	    }
	}
    }))
}

fn children(elements: &[Element]) -> Result<Vec<TokenStream>> {
    let mut blocks = Vec::new();
    for child in elements {
	if let Some(block) = element(child)? {
	    blocks.push(block);
	}
    }
    Ok(blocks)
}

fn transform(view_box: &Rect) -> TokenStream {
    if view_box.width <= 0.0 || view_box.height <= 0.0 {
	return quote!(tiny_skia::Transform::identity());
    }

    let (box_width, box_height) = (Num(view_box.width), Num(view_box.height));
    let scale = quote!(tiny_skia::Transform::from_scale(width as f32 / #box_width, height as f32 / #box_height));

    if view_box.x == 0.0 && view_box.y == 0.0 {
	scale
    } else {
	let (dx, dy) = (Num(-view_box.x), Num(-view_box.y));
	quote!(#scale.pre_translate(#dx, #dy))
    }
}

///Cached accessor drawing `document`, as a token stream.
pub fn generate(document: &Document, options: &Options) -> Result<TokenStream> {
    let name = Name::from_title(&document.title)?;
    let (accessor, cache) = (name.accessor(), name.cache());

    let visibility = match options.visibility {
	Visibility::Public => quote!(pub),
	Visibility::Crate => quote!(pub(crate)),
    };

    let width = document.size.width.ceil() as u32;
    let height = document.size.height.ceil() as u32;

    let blocks = children(&document.children)?;
    let transform = transform(&document.view_box);

    let tint_key = quote! {
	tint.map(|tint| {
	    let tint = tint.to_color_u8();
	    [tint.red(), tint.green(), tint.blue(), tint.alpha()]
	})
    };

    let (key_type, parameters, size, key) = if options.size_in_cache_key {
	(
	    quote!((u32, u32, Option<[u8; 4]>)),
	    quote!(size: Option<(u32, u32)>, tint: Option<tiny_skia::Color>),
	    quote!(let (width, height) = size.unwrap_or((#width, #height));),
	    quote!(let key = (width, height, #tint_key);),
	)
    } else {
	(
	    quote!(Option<[u8; 4]>),
	    quote!(tint: Option<tiny_skia::Color>),
	    quote!(let (width, height): (u32, u32) = (#width, #height);),
	    quote!(let key = #tint_key;),
	)
    };

    tracing::debug!(
	identifier = name.as_str(),
	blocks = blocks.len(),
	"generated accessor"
    );

    Ok(quote! {
	#[allow(non_upper_case_globals)]
	static #cache: std::sync::OnceLock<
	    std::sync::Mutex<std::collections::HashMap<#key_type, std::sync::Arc<tiny_skia::Pixmap>>>,
	> = std::sync::OnceLock::new();

	#[allow(non_snake_case, unused_mut, unused_variables)]
	#visibility fn #accessor(#parameters) -> Option<std::sync::Arc<tiny_skia::Pixmap>> {
	    #size
	    #key
	    let cache = #cache.get_or_init(Default::default);
	    if let Some(pixmap) = cache.lock().ok()?.get(&key) {
		return Some(pixmap.clone());
	    }

	    let mut pixmap = tiny_skia::Pixmap::new(width, height)?;
	    let transform = #transform;
	    #(#blocks)*

	    let mut cache = cache.lock().ok()?;
	    Some(cache.entry(key).or_insert_with(|| std::sync::Arc::new(pixmap)).clone())
	}
    })
}

///Lays the tokens out as a source file, one statement per line.
fn format_source(tokens: TokenStream) -> Result<String> {
    let file: syn::File = syn::parse2(tokens).map_err(|err| CodegenError::Unformattable(err.to_string()))?;
    Ok(prettyplease::unparse(&file))
}

///Source text of the accessor, optionally behind a header comment.
pub fn render(document: &Document, options: &Options) -> Result<String> {
    let code = format_source(generate(document, options)?)?;

    if !options.header {
	return Ok(code);
    }

    let title = document.title.replace(|c: char| c.is_control(), " ");
    Ok(format!(
	"// Generated by vectorgen from \"{}\". Do not edit.\n{}",
	title, code
    ))
}

///Conventional output file for `document`, `<Identifier>+Generated.rs`.
pub fn output_file_name(document: &Document) -> Result<String> {
    Ok(Name::from_title(&document.title)?.file_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use svgr::{Color, Ellipse, Group, Line, Path, Polygon, Rectangle, Size};

    fn blue_on_black() -> Style {
	Style {
	    fill: Some(Color::rgb(0.0, 0.0, 1.0)),
	    stroke: Some(Color::rgb(0.0, 0.0, 0.0)),
	    stroke_width: Some(3.0),
	    ..Style::new()
	}
    }

    fn blue_on_black_paint() -> TokenStream {
	quote! {
	    let stroke = tiny_skia::Stroke { width: 3.00, ..tiny_skia::Stroke::default() };
	    let mut fill_paint = tiny_skia::Paint::default();
	    let mut stroke_paint = tiny_skia::Paint::default();
	    if let Some(tint) = tint {
		fill_paint.set_color(tint);
		stroke_paint.set_color(tint);
	    } else {
		fill_paint.set_color(tiny_skia::Color::from_rgba(0.00, 0.00, 1.00, 1.00)?);
		stroke_paint.set_color(tiny_skia::Color::from_rgba(0.00, 0.00, 0.00, 1.00)?);
	    }
	    pixmap.fill_path(&path, &fill_paint, tiny_skia::FillRule::Winding, transform, None);
	    pixmap.stroke_path(&path, &stroke_paint, &stroke, transform, None);
	}
    }

    fn code(element_: Element) -> String {
	element(&element_).unwrap().unwrap().to_string()
    }

    #[test]
    fn ellipse_block() {
	let ellipse = Element::Ellipse(Ellipse {
	    center: Point::new(50.0, 50.0),
	    radius: Size::new(30.0, 20.0),
	    style: blue_on_black(),
	});
	let paint = blue_on_black_paint();

	let expected = quote! {
	    {
		let path = tiny_skia::Rect::from_xywh(20.00, 30.00, 60.00, 40.00).and_then(tiny_skia::PathBuilder::from_oval);
		if let Some(path) = path {
		    #paint
		}
	    }
	};
	assert_eq!(code(ellipse), expected.to_string());
    }

    #[test]
    fn path_block() {
	let path = Element::Path(Path {
	    commands: vec![
		PathCommand::MoveTo(Point::new(10.0, 90.0)),
		PathCommand::CubicCurve {
		    control_start: Point::new(30.0, 90.0),
		    control_end: Point::new(30.0, 10.0),
		    end: Point::new(50.0, 10.0),
		},
		PathCommand::QuadraticCurve {
		    control: Point::new(70.0, 10.0),
		    end: Point::new(90.0, 90.0),
		},
		PathCommand::LineTo(Point::new(10.0, -0.5)),
		PathCommand::ClosePath,
	    ],
	    style: blue_on_black(),
	});
	let paint = blue_on_black_paint();

	let expected = quote! {
	    {
		let path = {
		    let mut builder = tiny_skia::PathBuilder::new();
		    builder.move_to(10.00, 90.00);
		    builder.cubic_to(30.00, 90.00, 30.00, 10.00, 50.00, 10.00);
		    builder.quad_to(70.00, 10.00, 90.00, 90.00);
		    builder.line_to(10.00, -0.50);
		    builder.close();
		    builder.finish()
		};
		if let Some(path) = path {
		    #paint
		}
	    }
	};
	assert_eq!(code(path), expected.to_string());
    }

    #[test]
    fn stroke_only_line() {
	let line = Element::Line(Line {
	    start: Point::new(1.0, 2.0),
	    end: Point::new(3.0, 4.0),
	    style: Style {
		fill: Some(Color::CLEAR),
		stroke: Some(Color::rgb(1.0, 0.0, 0.0)),
		stroke_width: Some(2.0),
		stroke_opacity: Some(0.5),
		opacity: Some(0.5),
		..Style::new()
	    },
	});

	let expected = quote! {
	    {
		let path = {
		    let mut builder = tiny_skia::PathBuilder::new();
		    builder.move_to(1.00, 2.00);
		    builder.line_to(3.00, 4.00);
		    builder.finish()
		};
		if let Some(path) = path {
		    let stroke = tiny_skia::Stroke { width: 2.00, ..tiny_skia::Stroke::default() };
		    let mut stroke_paint = tiny_skia::Paint::default();
		    if let Some(tint) = tint {
			stroke_paint.set_color(tint);
		    } else {
			stroke_paint.set_color(tiny_skia::Color::from_rgba(1.00, 0.00, 0.00, 0.25)?);
		    }
		    pixmap.stroke_path(&path, &stroke_paint, &stroke, transform, None);
		}
	    }
	};
	assert_eq!(code(line), expected.to_string());
    }

    #[test]
    fn fill_rule_is_carried() {
	let polygon = Element::Polygon(Polygon {
	    points: vec![Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(4.0, 4.0)],
	    style: Style {
		fill_rule: Some(FillRule::EvenOdd),
		..Style::defaults()
	    },
	});

	let generated = code(polygon);
	assert!(generated.contains(&quote!(tiny_skia::FillRule::EvenOdd).to_string()));
	assert!(generated.contains(&quote!(builder.close();).to_string()));
	assert!(!generated.contains("stroke_path"));
    }

    #[test]
    fn unpainted_and_empty_elements_are_skipped() {
	let clear = Element::Rectangle(Rectangle {
	    frame: Rect::new(0.0, 0.0, 1.0, 1.0),
	    style: Style {
		fill: Some(Color::CLEAR),
		..Style::new()
	    },
	    ..Rectangle::default()
	});
	assert!(element(&clear).unwrap().is_none());

	let empty = Element::Polygon(Polygon {
	    points: Vec::new(),
	    style: Style::defaults(),
	});
	assert!(element(&empty).unwrap().is_none());
    }

    #[test]
    fn groups_always_recurse() {
	let group = Element::Group(Group {
	    children: vec![Element::Rectangle(Rectangle {
		frame: Rect::new(0.0, 0.0, 300.0, 100.0),
		style: blue_on_black(),
		..Rectangle::default()
	    })],
	    style: Style {
		fill: Some(Color::CLEAR),
		..Style::new()
	    },
	});
	let paint = blue_on_black_paint();

	let expected = quote! {
	    {
		{
		    let path = tiny_skia::Rect::from_xywh(0.00, 0.00, 300.00, 100.00).map(tiny_skia::PathBuilder::from_rect);
		    if let Some(path) = path {
			#paint
		    }
		}
	    }
	};
	assert_eq!(code(group), expected.to_string());
    }

    #[test]
    fn rounded_rect_corners() {
	let commands = rounded_rect(&Rect::new(0.0, 0.0, 10.0, 10.0), 2.0, 2.0);

	assert_eq!(commands.len(), 10);
	assert_eq!(commands[0], PathCommand::MoveTo(Point::new(2.0, 0.0)));
	assert_eq!(commands[1], PathCommand::LineTo(Point::new(8.0, 0.0)));
	match commands[2] {
	    PathCommand::CubicCurve { end, .. } => assert_eq!(end, Point::new(10.0, 2.0)),
	    other => panic!("unexpected {:?}", other),
	}
	match commands[8] {
	    PathCommand::CubicCurve { end, .. } => assert_eq!(end, Point::new(2.0, 0.0)),
	    other => panic!("unexpected {:?}", other),
	}
	assert_eq!(commands[9], PathCommand::ClosePath);
    }

    #[test]
    fn view_box_transform() {
	assert_eq!(
	    transform(&Rect::new(0.0, 0.0, 20.0, 10.0)).to_string(),
	    quote!(tiny_skia::Transform::from_scale(width as f32 / 20.00, height as f32 / 10.00)).to_string()
	);
	assert_eq!(
	    transform(&Rect::new(-5.0, 5.0, 20.0, 10.0)).to_string(),
	    quote!(tiny_skia::Transform::from_scale(width as f32 / 20.00, height as f32 / 10.00).pre_translate(5.00, -5.00))
		.to_string()
	);
	assert_eq!(
	    transform(&Rect::default()).to_string(),
	    quote!(tiny_skia::Transform::identity()).to_string()
	);
    }

    #[test]
    fn unsupported_colors_fail_generation() {
	let mut document = Document::new(Size::new(1.0, 1.0), Rect::new(0.0, 0.0, 1.0, 1.0));
	document.title = String::from("odd");
	document.children.push(Element::Rectangle(Rectangle {
	    frame: Rect::new(0.0, 0.0, 1.0, 1.0),
	    style: Style {
		fill: Some(Color::rgba(2.0, 0.0, 0.0, 1.0)),
		..Style::defaults()
	    },
	    ..Rectangle::default()
	}));

	assert!(matches!(
	    generate(&document, &Options::default()),
	    Err(CodegenError::UnsupportedColor(_))
	));
    }

    #[test]
    fn untitled_documents_fail_generation() {
	let document = Document::new(Size::new(1.0, 1.0), Rect::new(0.0, 0.0, 1.0, 1.0));

	assert!(matches!(
	    generate(&document, &Options::default()),
	    Err(CodegenError::InvalidTitle)
	));
	assert_eq!(output_file_name(&document), Err(CodegenError::InvalidTitle));
    }
}
