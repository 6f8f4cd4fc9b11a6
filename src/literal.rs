use proc_macro2::{Punct, Spacing, Span, TokenStream};
use quote::{quote, ToTokens, TokenStreamExt};
use syn::LitFloat;

use svgr::{Color, Point};

use crate::error::CodegenError;

///A float literal with exactly two decimals, e.g. `0.55`.
///
///Values that round to zero lose their sign, so `-0.001` is written `0.00`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Num(pub f64);

impl ToTokens for Num {
    fn to_tokens(&self, tokens: &mut TokenStream) {
	let value = if self.0.is_finite() { self.0 } else { 0.0 };
	let digits = format!("{:.2}", value.abs());

	if value < 0.0 && digits != "0.00" {
	    tokens.append(Punct::new('-', Spacing::Alone));
	}
	LitFloat::new(&digits, Span::call_site()).to_tokens(tokens);
    }
}

///`x, y` as two literals, for argument lists.
pub fn point(point: Point) -> TokenStream {
    let (x, y) = (Num(point.x), Num(point.y));
    quote!(#x, #y)
}

fn in_unit_range(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

///Expression building `color` with its alpha scaled by `opacity`.
///
///Evaluates to a `tiny_skia::Color`, using `?` on the fallible constructor.
pub fn color(color: Color, opacity: f64) -> Result<TokenStream, CodegenError> {
    if ![color.r, color.g, color.b, color.a].iter().all(|&c| in_unit_range(c)) || !opacity.is_finite() {
	return Err(CodegenError::UnsupportedColor(color));
    }

    let alpha = (color.a * opacity).max(0.0).min(1.0);
    let (r, g, b, a) = (Num(color.r), Num(color.g), Num(color.b), Num(alpha));

    Ok(quote!(tiny_skia::Color::from_rgba(#r, #g, #b, #a)?))
}
