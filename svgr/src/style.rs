use std::fmt;
use std::str::FromStr;

use crate::color::{parse_color, Color};
use crate::diagnostic::{Diagnostic, Diagnostics, LogDiagnostics};
use crate::error::{Error, Result};
use crate::number::{parse_length, parse_number};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillRule {
    NonZero,
    EvenOdd,
}

impl Default for FillRule {
    fn default() -> Self {
	FillRule::NonZero
    }
}

impl FillRule {
    ///Anything but `evenodd` is treated as `nonzero`.
    pub fn parse(value: &str) -> FillRule {
	if value.trim().eq_ignore_ascii_case("evenodd") {
	    FillRule::EvenOdd
	} else {
	    FillRule::NonZero
	}
    }

    pub fn as_str(&self) -> &'static str {
	match self {
	    FillRule::NonZero => "nonzero",
	    FillRule::EvenOdd => "evenodd",
	}
    }
}

impl fmt::Display for FillRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
	f.write_str(self.as_str())
    }
}

///Cascading paint properties. Every field is independently set or unset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Style {
    pub fill: Option<Color>,
    pub fill_opacity: Option<f64>,
    pub stroke: Option<Color>,
    pub stroke_width: Option<f64>,
    pub stroke_opacity: Option<f64>,
    pub opacity: Option<f64>,
    pub fill_rule: Option<FillRule>,
}

impl Style {
    pub fn new() -> Self {
	Style::default()
    }

    ///Initial values every cascade starts from: black fill, 1px stroke.
    pub fn defaults() -> Self {
	Style {
	    fill: Some(Color::BLACK),
	    stroke_width: Some(1.0),
	    ..Style::default()
	}
    }

    pub fn fill_opacity(&self) -> f64 {
	self.fill_opacity.unwrap_or(1.0)
    }

    pub fn stroke_width(&self) -> f64 {
	self.stroke_width.unwrap_or(0.0)
    }

    pub fn stroke_opacity(&self) -> f64 {
	self.stroke_opacity.unwrap_or(1.0)
    }

    pub fn opacity(&self) -> f64 {
	self.opacity.unwrap_or(1.0)
    }

    pub fn fill_rule(&self) -> FillRule {
	self.fill_rule.unwrap_or_default()
    }

    pub fn has_fill(&self) -> bool {
	matches!(self.fill, Some(fill) if !fill.is_clear())
    }

    pub fn has_stroke(&self) -> bool {
	matches!(self.stroke, Some(stroke) if !stroke.is_clear()) && self.stroke_width() > 0.0
    }

    ///Fields set in `other` replace those of `self`.
    pub fn merge(&self, other: &Style) -> Style {
	Style {
	    fill: other.fill.or(self.fill),
	    fill_opacity: other.fill_opacity.or(self.fill_opacity),
	    stroke: other.stroke.or(self.stroke),
	    stroke_width: other.stroke_width.or(self.stroke_width),
	    stroke_opacity: other.stroke_opacity.or(self.stroke_opacity),
	    opacity: other.opacity.or(self.opacity),
	    fill_rule: other.fill_rule.or(self.fill_rule),
	}
    }

    ///Effective style of a child declaring `own` under a parent whose style
    ///is already resolved.
    pub fn cascade(parent: &Style, own: &Style) -> Style {
	Style::defaults().merge(parent).merge(own)
    }

    ///Parses a `style=` declaration block such as `fill:red;stroke-width:2`.
    ///
    ///Unrecognized properties are reported to `diagnostics` and skipped. A
    ///malformed value fails the whole block.
    pub fn parse_with(definition: &str, diagnostics: &mut dyn Diagnostics) -> Result<Style> {
	let mut result = Style::new();

	for rule in definition.split(';') {
	    if rule.trim().is_empty() {
		continue;
	    }

	    let (name, value) = match rule.find(':') {
		Some(i) => (&rule[..i], rule[i + 1..].trim()),
		None => {
		    diagnostics.report(Diagnostic::UnknownStyleProperty(String::from(rule.trim())));
		    continue;
		}
	    };

	    match name.trim().to_lowercase().as_str() {
		"fill" => result.fill = Some(parse_color(value)?),
		"stroke" => result.stroke = Some(parse_color(value)?),
		"stroke-width" => result.stroke_width = Some(parse_length(value)?),
		"fill-opacity" => result.fill_opacity = Some(parse_number(value)?),
		"stroke-opacity" => result.stroke_opacity = Some(parse_number(value)?),
		"opacity" => result.opacity = Some(parse_number(value)?),
		"fill-rule" => result.fill_rule = Some(FillRule::parse(value)),
		_ => diagnostics.report(Diagnostic::UnknownStyleProperty(String::from(rule.trim()))),
	    }
	}

	Ok(result)
    }

    pub fn parse(definition: &str) -> Result<Style> {
	Style::parse_with(definition, &mut LogDiagnostics)
    }
}

impl FromStr for Style {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
	Style::parse(s)
    }
}
