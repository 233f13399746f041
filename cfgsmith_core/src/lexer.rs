use logos::Logos;

use crate::CfgError;
use crate::CfgResult;
use crate::tokens::Segment;
use crate::tokens::is_identifier;

/// Raw tokens produced by logos for a single template line.
#[derive(Logos, Debug, PartialEq)]
enum RawToken {
	#[token("{{")]
	PlaceholderOpen,
	#[token("}}")]
	PlaceholderClose,
	#[token("{")]
	LoneBraceOpen,
	#[token("}")]
	LoneBraceClose,
	#[regex(r"[^{}]+")]
	Text,
}

/// Context states for the segment builder.
#[derive(Clone, Copy)]
enum LexerContext {
	/// Collecting literal text.
	Literal,
	/// Inside `{{ ... }}`, collecting the placeholder name. Holds the byte
	/// offset of the opening marker for error reporting.
	Placeholder(usize),
}

/// Walks the logos token stream for one line and builds its segments.
struct SegmentWalker<'a> {
	source: &'a str,
	/// 1-indexed line number within the template.
	line: usize,
	/// Byte offset of `source` within the raw template line.
	column_offset: usize,
	/// Reject a placeholder name that already appeared on this line.
	unique_names: bool,
	context: LexerContext,
	buffer: String,
	segments: Vec<Segment>,
}

impl<'a> SegmentWalker<'a> {
	fn new(source: &'a str, line: usize, column_offset: usize, unique_names: bool) -> Self {
		Self {
			source,
			line,
			column_offset,
			unique_names,
			context: LexerContext::Literal,
			buffer: String::new(),
			segments: Vec::new(),
		}
	}

	fn error(&self, offset: usize, message: impl Into<String>) -> CfgError {
		CfgError::Compile {
			line: self.line,
			column: self.column_offset + offset + 1,
			message: message.into(),
		}
	}

	fn flush_literal(&mut self) {
		if !self.buffer.is_empty() {
			let text = std::mem::take(&mut self.buffer);
			self.segments.push(Segment::Literal(text));
		}
	}

	fn close_placeholder(&mut self, open_offset: usize) -> CfgResult<()> {
		let raw = std::mem::take(&mut self.buffer);
		let name = raw.trim();

		if name.is_empty() {
			return Err(self.error(open_offset, "placeholder name is empty"));
		}

		if !is_identifier(name) {
			return Err(self.error(open_offset, format!("invalid placeholder name `{name}`")));
		}

		let duplicate = self.unique_names
			&& self
				.segments
				.iter()
				.any(|segment| segment.placeholder_name() == Some(name));
		if duplicate {
			return Err(self.error(
				open_offset,
				format!("placeholder `{name}` appears more than once on this line"),
			));
		}

		self.segments.push(Segment::Placeholder(name.to_string()));
		self.context = LexerContext::Literal;
		Ok(())
	}

	fn process(mut self) -> CfgResult<Vec<Segment>> {
		let source = self.source;
		for (result, span) in RawToken::lexer(source).spanned() {
			let slice = &source[span.clone()];
			let Ok(raw) = result else {
				return Err(self.error(span.start, format!("unexpected input `{slice}`")));
			};

			match self.context {
				LexerContext::Literal => {
					match raw {
						RawToken::PlaceholderOpen => {
							self.flush_literal();
							self.context = LexerContext::Placeholder(span.start);
						}
						RawToken::PlaceholderClose => {
							return Err(self.error(span.start, "unbalanced braces: `}}` without `{{`"));
						}
						RawToken::LoneBraceOpen | RawToken::LoneBraceClose | RawToken::Text => {
							self.buffer.push_str(slice);
						}
					}
				}
				LexerContext::Placeholder(open_offset) => {
					match raw {
						RawToken::PlaceholderClose => self.close_placeholder(open_offset)?,
						RawToken::PlaceholderOpen => {
							return Err(self.error(span.start, "unbalanced braces: nested `{{`"));
						}
						RawToken::LoneBraceOpen | RawToken::LoneBraceClose | RawToken::Text => {
							self.buffer.push_str(slice);
						}
					}
				}
			}
		}

		if let LexerContext::Placeholder(open_offset) = self.context {
			return Err(self.error(open_offset, "unbalanced braces: `{{` is never closed"));
		}

		self.flush_literal();
		Ok(self.segments)
	}
}

/// Split the content of one template line into literal and placeholder
/// segments. `column_offset` is the width of the indentation stripped from
/// the raw line so error columns point into the original text.
pub fn tokenize_line(content: &str, line: usize, column_offset: usize) -> CfgResult<Vec<Segment>> {
	SegmentWalker::new(content, line, column_offset, true).process()
}

/// Split one line of an output template. The same name may appear more than
/// once, and `content` may end with its newline.
pub fn tokenize_output_line(content: &str, line: usize) -> CfgResult<Vec<Segment>> {
	SegmentWalker::new(content, line, 0, false).process()
}
