use nom::{
    branch::alt,
    character::complete::{char, digit0, digit1, one_of},
    combinator::{opt, recognize},
    sequence::{pair, tuple},
    IResult,
};

use crate::error::{Error, Result};

///Recognizes one decimal or exponential literal at the start of `input`.
///
///Stops at anything that cannot continue the literal, so a sign or a second
///decimal point begins the next number: `5-5` and `.5.5` both yield two.
fn float_literal(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
	opt(one_of("+-")),
	alt((
	    recognize(pair(digit1, opt(pair(char('.'), digit0)))),
	    recognize(pair(char('.'), digit1)),
	)),
	opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
    )))(input)
}

fn is_separator(c: char) -> bool {
    c == ',' || c.is_whitespace()
}

fn literal_value(literal: &str, source: &str) -> Result<f64> {
    match literal.parse::<f64>() {
	Ok(value) if value.is_finite() => Ok(value),
	_ => Err(Error::InvalidNumber(String::from(source))),
    }
}

///Parses a whole string as a single number.
pub fn parse_number(text: &str) -> Result<f64> {
    match float_literal(text.trim()) {
	Ok(("", literal)) => literal_value(literal, text),
	_ => Err(Error::InvalidNumber(String::from(text))),
    }
}

///Like [`parse_number`], also accepting a trailing `px` unit.
pub fn parse_length(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    let value = trimmed.strip_suffix("px").unwrap_or(trimmed);

    parse_number(value).map_err(|_| Error::InvalidNumber(String::from(text)))
}

///Splits a compact numeric run into numbers.
///
///Numbers may be separated by whitespace, commas, or nothing at all where
///the boundary is unambiguous.
pub fn parse_number_list(raw: &str) -> Result<Vec<f64>> {
    let mut numbers = Vec::new();
    let mut rest = raw;

    loop {
	rest = rest.trim_start_matches(is_separator);
	if rest.is_empty() {
	    return Ok(numbers);
	}

	match float_literal(rest) {
	    Ok((tail, literal)) => {
		numbers.push(literal_value(literal, literal)?);
		rest = tail;
	    }
	    Err(_) => {
		let token = rest.split(is_separator).next().unwrap_or(rest);
		return Err(Error::InvalidNumber(String::from(token)));
	    }
	}
    }
}
