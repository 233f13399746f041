use derive_more::Deref;

/// One line of device configuration text, viewed through its indentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLine<'a> {
	/// The line exactly as it appears in the input, without the newline.
	pub raw: &'a str,
	/// Number of leading space or tab characters.
	pub indent: usize,
	/// The line with leading and trailing whitespace removed.
	pub content: &'a str,
	/// 1-indexed line number within the input.
	pub number: usize,
}

impl<'a> ConfigLine<'a> {
	pub fn new(raw: &'a str, number: usize) -> Self {
		Self {
			raw,
			indent: indent_width(raw),
			content: raw.trim(),
			number,
		}
	}

	pub fn is_blank(&self) -> bool {
		self.content.is_empty()
	}
}

/// The non-blank lines of a configuration, in document order.
#[derive(Debug, Clone, Deref)]
pub struct ConfigLines<'a>(
	#[deref]
	Vec<ConfigLine<'a>>,
);

impl<'a> ConfigLines<'a> {
	pub fn parse(text: &'a str) -> Self {
		let lines = text
			.lines()
			.enumerate()
			.map(|(index, raw)| ConfigLine::new(raw, index + 1))
			.filter(|line| !line.is_blank())
			.collect();

		Self(lines)
	}
}

/// Width of the leading whitespace of `line`, counting each space or tab as
/// one column.
pub fn indent_width(line: &str) -> usize {
	line.chars()
		.take_while(|ch| *ch == ' ' || *ch == '\t')
		.count()
}

/// Normalize line endings to LF (`\n`). Converts CRLF and bare CR.
pub fn normalize_line_endings(content: &str) -> String {
	if content.contains('\r') {
		content.replace("\r\n", "\n").replace('\r', "\n")
	} else {
		content.to_string()
	}
}
