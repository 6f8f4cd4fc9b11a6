use std::fmt;

///Input that was understood well enough to be ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    UnknownElement(String),
    UnknownAttribute {
	element: String,
	name: String,
	value: String,
    },
    UnknownStyleProperty(String),
    ///An unsupported container whose contents are not drawn.
    SkippedSubtree(String),
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
	match self {
	    Diagnostic::UnknownElement(name) => write!(f, "unrecognized element <{}>", name),
	    Diagnostic::UnknownAttribute { element, name, value } => {
		write!(f, "unrecognized attribute {}={:?} on <{}>", name, value, element)
	    }
	    Diagnostic::UnknownStyleProperty(rule) => write!(f, "unrecognized style rule {:?}", rule),
	    Diagnostic::SkippedSubtree(name) => write!(f, "skipping unsupported <{}> and its children", name),
	}
    }
}

pub trait Diagnostics {
    fn report(&mut self, diagnostic: Diagnostic);
}

///Collects diagnostics for later inspection.
impl Diagnostics for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
	self.push(diagnostic);
    }
}

///Forwards diagnostics to the `tracing` log as warnings.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
	tracing::warn!("{}", diagnostic);
    }
}
