use std::sync::Once;

use quote::quote;

use svgr::{Color, Document, Element, Rect, Rectangle, Size, Style};
use vectorgen::{convert, generate, output_file_name, render, CodegenError, Error, Options, Visibility};

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
	let _ = tracing_subscriber::fmt()
	    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
	    .with_test_writer()
	    .try_init();
    });
}

const HEART: &str = r#"<svg viewBox="0 0 100 100" xmlns="http://www.w3.org/2000/svg">
    <path fill="none" stroke="red"
    d="M 10,30
    A 20,20 0,0,1 50,30
    A 20,20 0,0,1 90,30
    Q 90,60 50,90
    Q 10,60 10,30 z" />
</svg>"#;

fn artboard() -> Document {
    let mut document = Document::new(Size::new(400.0, 110.0), Rect::new(0.0, 0.0, 400.0, 110.0));
    document.title = String::from("artboard");
    document.children.push(Element::Rectangle(Rectangle {
	frame: Rect::new(0.0, 0.0, 300.0, 100.0),
	style: Style {
	    fill: Some(Color::rgb(0.0, 0.0, 1.0)),
	    stroke: Some(Color::rgb(0.0, 0.0, 0.0)),
	    stroke_width: Some(3.0),
	    ..Style::new()
	},
	..Rectangle::default()
    }));
    document
}

#[test]
fn cached_accessor() {
    init_tracing();
    let generated = generate(&artboard(), &Options::default()).unwrap();

    let expected = quote! {
	#[allow(non_upper_case_globals)]
	static artboardCache: std::sync::OnceLock<
	    std::sync::Mutex<std::collections::HashMap<(u32, u32, Option<[u8; 4]>), std::sync::Arc<tiny_skia::Pixmap>>>,
	> = std::sync::OnceLock::new();

	#[allow(non_snake_case, unused_mut, unused_variables)]
	pub fn artboard(size: Option<(u32, u32)>, tint: Option<tiny_skia::Color>) -> Option<std::sync::Arc<tiny_skia::Pixmap>> {
	    let (width, height) = size.unwrap_or((400u32, 110u32));
	    let key = (width, height, tint.map(|tint| {
		let tint = tint.to_color_u8();
		[tint.red(), tint.green(), tint.blue(), tint.alpha()]
	    }));
	    let cache = artboardCache.get_or_init(Default::default);
	    if let Some(pixmap) = cache.lock().ok()?.get(&key) {
		return Some(pixmap.clone());
	    }

	    let mut pixmap = tiny_skia::Pixmap::new(width, height)?;
	    let transform = tiny_skia::Transform::from_scale(width as f32 / 400.00, height as f32 / 110.00);
	    {
		let path = tiny_skia::Rect::from_xywh(0.00, 0.00, 300.00, 100.00).map(tiny_skia::PathBuilder::from_rect);
		if let Some(path) = path {
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

	    let mut cache = cache.lock().ok()?;
	    Some(cache.entry(key).or_insert_with(|| std::sync::Arc::new(pixmap)).clone())
	}
    };

    assert_eq!(generated.to_string(), expected.to_string());
}

fn has_line(code: &str, statement: &str) -> bool {
    code.lines().any(|line| line.trim() == statement)
}

#[test]
fn tint_only_cache_key() {
    let options = Options {
	size_in_cache_key: false,
	visibility: Visibility::Crate,
	header: false,
    };
    let tokens = generate(&artboard(), &options).unwrap().to_string();

    let signature = quote! {
	pub(crate) fn artboard(tint: Option<tiny_skia::Color>) -> Option<std::sync::Arc<tiny_skia::Pixmap>>
    };
    assert!(tokens.contains(&signature.to_string()));
    assert!(tokens.contains(&quote!(std::collections::HashMap<Option<[u8; 4]>, std::sync::Arc<tiny_skia::Pixmap>>).to_string()));

    let code = render(&artboard(), &options).unwrap();
    assert!(code.starts_with('#'));
    assert!(code.contains("pub(crate) fn artboard("));
    assert!(has_line(&code, "let (width, height): (u32, u32) = (400u32, 110u32);"));
}

#[test]
fn heart_end_to_end() {
    init_tracing();
    let code = convert(HEART, "Heart", &Options::default()).unwrap();

    assert!(code.starts_with("// Generated by vectorgen from \"Heart\". Do not edit.\n#[allow(non_upper_case_globals)]\n"));
    assert!(code.contains("static heartCache:"));
    assert!(code.contains("pub fn heart("));
    assert!(has_line(&code, "let (width, height) = size.unwrap_or((100u32, 100u32));"));
    assert!(has_line(&code, "builder.move_to(10.00, 30.00);"));
    assert!(has_line(&code, "builder.quad_to(90.00, 60.00, 50.00, 90.00);"));
    assert!(code.contains("tiny_skia::Color::from_rgba(1.00, 0.00, 0.00, 1.00)?"));
    assert!(!code.contains("fill_path"));
    assert_eq!(code.matches("cubic_to").count(), 4);
    assert!(code.ends_with("}\n"));
}

#[test]
fn rendered_source_has_one_statement_per_line() {
    let code = convert(HEART, "Heart", &Options::default()).unwrap();

    let drawing: Vec<&str> = code
	.lines()
	.map(str::trim)
	.filter(|line| line.starts_with("builder."))
	.collect();
    // move, two arcs of two cubics each, two quads, close and finish
    assert_eq!(drawing.len(), 9);
    for line in &drawing {
	assert!(line.ends_with(';') || *line == "builder.finish()", "{:?}", line);
	assert!(line.matches(';').count() <= 1, "{:?}", line);
    }

    assert!(has_line(&code, "let mut pixmap = tiny_skia::Pixmap::new(width, height)?;"));
    assert!(code.lines().count() > 30);
}

#[test]
fn regeneration_is_byte_identical() {
    let first = convert(HEART, "Heart", &Options::default()).unwrap();
    let second = convert(HEART, "Heart", &Options::default()).unwrap();
    assert_eq!(first, second);

    let document = artboard();
    assert_eq!(
	render(&document, &Options::default()).unwrap(),
	render(&document, &Options::default()).unwrap()
    );
}

#[test]
fn title_element_wins_over_fallback() {
    let code = convert(
	r#"<svg width="14" height="14"><title>NoteTag</title><rect width="4" height="4"/></svg>"#,
	"Tag",
	&Options::default(),
    )
    .unwrap();

    assert!(code.contains("pub fn noteTag("));
}

#[test]
fn failures_keep_their_origin() {
    assert!(matches!(
	convert(HEART, "", &Options::default()),
	Err(Error::Codegen(CodegenError::InvalidTitle))
    ));
    assert!(matches!(
	convert(r#"<svg width="1"><path d="X10 10"/></svg>"#, "Broken", &Options::default()),
	Err(Error::Parse(svgr::Error::PathSyntax { .. }))
    ));
}

#[test]
fn output_file_names() {
    let mut document = artboard();
    assert_eq!(output_file_name(&document).unwrap(), "Artboard+Generated.rs");

    document.title = String::from("note tag");
    assert_eq!(output_file_name(&document).unwrap(), "NoteTag+Generated.rs");
}
