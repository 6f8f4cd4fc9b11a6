use proc_macro2::{Ident, Span};

use crate::error::CodegenError;

///Splits a title into lowercase words.
///
///Anything that is not an ASCII letter or digit separates words, as do a
///lowercase letter or digit followed by an uppercase letter (`noteTag`) and
///the last capital of a run that starts a new word (`HTTPServer`).
pub fn words(title: &str) -> Vec<String> {
    let chars: Vec<char> = title.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
	if !c.is_ascii_alphanumeric() {
	    if !current.is_empty() {
		words.push(std::mem::take(&mut current));
	    }
	    continue;
	}

	if !current.is_empty() {
	    let prev = chars[i - 1];
	    let next_is_lower = chars.get(i + 1).map_or(false, |n| n.is_ascii_lowercase());

	    let boundary = ((prev.is_ascii_lowercase() || prev.is_ascii_digit()) && c.is_ascii_uppercase())
		|| (prev.is_ascii_uppercase() && c.is_ascii_uppercase() && next_is_lower);
	    if boundary {
		words.push(std::mem::take(&mut current));
	    }
	}

	current.push(c.to_ascii_lowercase());
    }

    if !current.is_empty() {
	words.push(current);
    }

    words
}

fn capitalized(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
	Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
	None => String::new(),
    }
}

pub fn lower_camel_case(title: &str) -> String {
    let mut words = words(title).into_iter();
    match words.next() {
	Some(first) => words.fold(first, |name, word| name + &capitalized(&word)),
	None => String::new(),
    }
}

pub fn upper_camel_case(title: &str) -> String {
    words(title).iter().map(|word| capitalized(word)).collect()
}

///Identifier naming the generated cache and accessor of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    ///Lower camel case, without any `r#` prefix.
    base: String,
}

impl Name {
    pub fn from_title(title: &str) -> Result<Self, CodegenError> {
	let mut base = lower_camel_case(title);

	if base.is_empty() {
	    return Err(CodegenError::InvalidTitle);
	}
	if base.starts_with(|c: char| c.is_ascii_digit()) {
	    base.insert(0, '_');
	}
	// not even usable as raw identifiers
	if base == "self" || base == "crate" || base == "super" {
	    base.push('_');
	}

	Ok(Name { base })
    }

    pub fn as_str(&self) -> &str {
	&self.base
    }

    ///The accessor, raw when the name is a keyword.
    pub fn accessor(&self) -> Ident {
	match syn::parse_str::<Ident>(&self.base) {
	    Ok(ident) => ident,
	    Err(_) => Ident::new_raw(&self.base, Span::call_site()),
	}
    }

    pub fn cache(&self) -> Ident {
	quote::format_ident!("{}Cache", self.as_str())
    }

    ///`<UpperCamel>+Generated.rs`, the conventional file for the output.
    pub fn file_name(&self) -> String {
	let stem = upper_camel_case(&self.base);
	format!("{}+Generated.rs", stem.trim_start_matches('_'))
    }
}
