use std::fmt::Display;

/// One piece of a template line: either text that must appear verbatim or a
/// named capture slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
	/// Literal text, e.g. `interface `
	Literal(String),
	/// A placeholder name, e.g. `ifname` from `{{ ifname }}`
	Placeholder(String),
}

impl Segment {
	pub fn placeholder_name(&self) -> Option<&str> {
		match self {
			Segment::Placeholder(name) => Some(name),
			Segment::Literal(_) => None,
		}
	}
}

impl Display for Segment {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Segment::Literal(text) => write!(f, "{text}"),
			Segment::Placeholder(name) => write!(f, "{{{{ {name} }}}}"),
		}
	}
}

/// Whether `name` is usable as a placeholder: an ASCII letter or underscore
/// followed by letters, digits or underscores.
pub fn is_identifier(name: &str) -> bool {
	let mut chars = name.chars();
	let Some(first) = chars.next() else {
		return false;
	};

	(first.is_ascii_alphabetic() || first == '_')
		&& chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}
