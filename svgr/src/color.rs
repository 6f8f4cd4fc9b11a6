use std::str::FromStr;

use nom::{
    bytes::complete::tag,
    character::complete::{char, digit1, space0},
    combinator::map_res,
    multi::separated_list1,
    sequence::{delimited, pair, preceded, tuple},
    IResult, Parser,
};

use crate::error::{Error, Result};

///RGBA color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

const NAMED_COLORS: &[(&str, u8, u8, u8)] = &[
    ("black", 0, 0, 0),
    ("silver", 192, 192, 192),
    ("gray", 128, 128, 128),
    ("grey", 128, 128, 128),
    ("white", 255, 255, 255),
    ("maroon", 128, 0, 0),
    ("red", 255, 0, 0),
    ("purple", 128, 0, 128),
    ("fuchsia", 255, 0, 255),
    ("magenta", 255, 0, 255),
    ("green", 0, 128, 0),
    ("lime", 0, 255, 0),
    ("olive", 128, 128, 0),
    ("yellow", 255, 255, 0),
    ("navy", 0, 0, 128),
    ("blue", 0, 0, 255),
    ("teal", 0, 128, 128),
    ("aqua", 0, 255, 255),
    ("cyan", 0, 255, 255),
    ("orange", 255, 165, 0),
];

impl Color {
    ///The `none` paint. Distinct from an unset color.
    pub const CLEAR: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
	Color { r, g, b, a: 1.0 }
    }

    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
	Color { r, g, b, a }
    }

    pub fn is_clear(&self) -> bool {
	*self == Color::CLEAR
    }

    pub fn with_alpha(self, a: f64) -> Color {
	Color { a, ..self }
    }

    fn from_bytes(r: u8, g: u8, b: u8) -> Color {
	Color::rgb(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
    }

    pub fn named(name: &str) -> Option<Color> {
	if name.eq_ignore_ascii_case("none") || name.eq_ignore_ascii_case("transparent") {
	    return Some(Color::CLEAR);
	}

	NAMED_COLORS
	    .iter()
	    .find(|(n, ..)| n.eq_ignore_ascii_case(name))
	    .map(|&(_, r, g, b)| Color::from_bytes(r, g, b))
    }
}

fn parse_hex(text: &str, digits: &str) -> Result<Color> {
    let err = || Error::InvalidColor(String::from(text));

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
	return Err(err());
    }
    let hex = u32::from_str_radix(digits, 16).map_err(|_| err())?;

    match digits.len() {
	3 => {
	    let channel = |shift: u32| ((hex >> shift) & 0xF) as f64 / 15.0;
	    Ok(Color::rgb(channel(8), channel(4), channel(0)))
	}
	6 => {
	    let channel = |shift: u32| ((hex >> shift) & 0xFF) as f64 / 255.0;
	    Ok(Color::rgb(channel(16), channel(8), channel(0)))
	}
	_ => Err(err()),
    }
}

///`name(args)`, allowing blanks between the name and the parenthesis.
fn css_function<'a, F, O>(name: &'a str, args: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: Parser<&'a str, O, nom::error::Error<&'a str>>,
{
    preceded(pair(tag(name), space0), delimited(char('('), args, char(')')))
}

fn byte(input: &str) -> IResult<&str, u8> {
    map_res(digit1, |digits: &str| digits.parse::<u8>())(input)
}

fn byte_list(input: &str) -> IResult<&str, Vec<u8>> {
    delimited(
	space0,
	separated_list1(tuple((space0, char(','), space0)), byte),
	space0,
    )(input)
}

fn parse_rgb_function(text: &str) -> Result<Color> {
    let err = || Error::InvalidColor(String::from(text));

    match css_function("rgb", byte_list)(text.trim()) {
	Ok(("", components)) => match components.as_slice() {
	    &[r, g, b] => Ok(Color::from_bytes(r, g, b)),
	    _ => Err(err()),
	},
	_ => Err(err()),
    }
}

///Parses `#rgb`, `#rrggbb`, `rgb(r,g,b)` and named colors.
pub fn parse_color(text: &str) -> Result<Color> {
    let trimmed = text.trim();

    if let Some(digits) = trimmed.strip_prefix('#') {
	return parse_hex(text, digits);
    }

    if trimmed.starts_with("rgb") {
	return parse_rgb_function(text);
    }

    Color::named(trimmed).ok_or_else(|| Error::InvalidColor(String::from(text)))
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
	parse_color(s)
    }
}
