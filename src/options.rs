#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Crate,
}

impl Default for Visibility {
    fn default() -> Self {
	Visibility::Public
    }
}

///Knobs for the generated accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    ///Take the output size as a parameter and cache per size, not only
    ///per tint.
    pub size_in_cache_key: bool,
    pub visibility: Visibility,
    ///Start the output with a "generated, do not edit" comment.
    pub header: bool,
}

impl Default for Options {
    fn default() -> Self {
	Options {
	    size_in_cache_key: true,
	    visibility: Visibility::default(),
	    header: true,
	}
    }
}
