use crate::CfgError;
use crate::CfgResult;
use crate::CompiledTemplate;
use crate::Record;
use crate::TemplateLine;
use crate::scanner::ConfigLines;
use crate::scanner::normalize_line_endings;
use crate::tokens::Segment;

/// A compiled piece of a line matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
	/// Text that must appear verbatim.
	Text(String),
	/// One or more whitespace characters.
	Space,
	/// A placeholder. `rest_of_line` is set when it is the final segment of
	/// its line and therefore takes the trimmed remainder.
	Capture { name: String, rest_of_line: bool },
}

/// Matches trimmed config line content against one template line.
#[derive(Debug, Clone)]
pub struct LineMatcher {
	pieces: Vec<Piece>,
}

impl LineMatcher {
	pub fn new(line: &TemplateLine) -> Self {
		let mut pieces = Vec::new();
		let last = line.segments.len().saturating_sub(1);

		for (index, segment) in line.segments.iter().enumerate() {
			match segment {
				Segment::Literal(text) => push_literal(&mut pieces, text),
				Segment::Placeholder(name) => {
					pieces.push(Piece::Capture {
						name: name.clone(),
						rest_of_line: index == last,
					});
				}
			}
		}

		Self { pieces }
	}

	/// Match `content` in full and return the captured fields in placeholder
	/// order, or `None` when the line does not match.
	pub fn captures(&self, content: &str) -> Option<Vec<(String, String)>> {
		let mut captures = Vec::new();
		match_from(&self.pieces, content, 0, &mut captures).then_some(captures)
	}

	pub fn is_match(&self, content: &str) -> bool {
		self.captures(content).is_some()
	}
}

/// Split a literal into verbatim words and whitespace runs.
fn push_literal(pieces: &mut Vec<Piece>, text: &str) {
	let mut word = String::new();

	for ch in text.chars() {
		if ch.is_whitespace() {
			if !word.is_empty() {
				pieces.push(Piece::Text(std::mem::take(&mut word)));
			}
			if !matches!(pieces.last(), Some(Piece::Space)) {
				pieces.push(Piece::Space);
			}
		} else {
			word.push(ch);
		}
	}

	if !word.is_empty() {
		pieces.push(Piece::Text(word));
	}
}

fn match_from(
	pieces: &[Piece],
	input: &str,
	position: usize,
	captures: &mut Vec<(String, String)>,
) -> bool {
	let Some((piece, rest)) = pieces.split_first() else {
		return position == input.len();
	};
	let remaining = &input[position..];

	match piece {
		Piece::Text(text) => {
			remaining.starts_with(text.as_str())
				&& match_from(rest, input, position + text.len(), captures)
		}
		Piece::Space => {
			let width = remaining.len() - remaining.trim_start().len();
			width > 0 && match_from(rest, input, position + width, captures)
		}
		Piece::Capture {
			name,
			rest_of_line: true,
		} => {
			let value = remaining.trim();
			if value.is_empty() {
				return false;
			}
			captures.push((name.clone(), value.to_string()));
			true
		}
		Piece::Capture { name, .. } => {
			// Shortest non-whitespace run that lets the rest of the line match.
			let word_end = remaining
				.find(char::is_whitespace)
				.unwrap_or(remaining.len());

			for (offset, ch) in remaining[..word_end].char_indices() {
				let end = offset + ch.len_utf8();
				captures.push((name.clone(), remaining[..end].to_string()));
				if match_from(rest, input, position + end, captures) {
					return true;
				}
				captures.pop();
			}

			false
		}
	}
}

/// A template line that is open while scanning, with the indentation of the
/// config line that opened it.
#[derive(Debug, Clone, Copy)]
struct MatchFrame {
	line: usize,
	indent: usize,
	/// Shallowest indentation seen below this frame so far. A line is a
	/// direct child candidate only when nothing shallower came before it.
	child_indent: Option<usize>,
}

/// Scan `config` with a compiled template and return one record per root
/// match, in the order the roots were matched.
///
/// Child template lines are optional: a root record is emitted whether or not
/// any of its children matched. Lines that match nothing are skipped. Fails
/// with [`CfgError::NoMatch`] when no root line matched anywhere.
pub fn extract(template: &CompiledTemplate, config: &str) -> CfgResult<Vec<Record>> {
	let config = normalize_line_endings(config);
	let lines = ConfigLines::parse(&config);
	let matchers: Vec<LineMatcher> = template.iter().map(LineMatcher::new).collect();
	let roots: Vec<usize> = template.roots().collect();

	let mut stack: Vec<MatchFrame> = Vec::new();
	let mut current: Option<Record> = None;
	let mut records = Vec::new();

	for line in lines.iter() {
		while stack.last().is_some_and(|frame| frame.indent >= line.indent) {
			stack.pop();
		}

		if let Some(frame) = stack.last_mut() {
			let child_indent = frame
				.child_indent
				.map_or(line.indent, |indent| indent.min(line.indent));
			frame.child_indent = Some(child_indent);
			if line.indent != child_indent {
				continue;
			}

			let children = &template[frame.line].children;
			if let Some((child, captures)) = first_match(children, &matchers, line.content) {
				tracing::trace!(
					line = line.number,
					template_line = template[child].number,
					"child match"
				);
				if let Some(record) = current.as_mut() {
					record.merge(captures);
				}
				stack.push(MatchFrame {
					line: child,
					indent: line.indent,
					child_indent: None,
				});
			}
			continue;
		}

		if let Some((root, captures)) = first_match(&roots, &matchers, line.content) {
			tracing::trace!(
				line = line.number,
				template_line = template[root].number,
				"root match"
			);
			if let Some(finished) = current.take() {
				records.push(finished);
			}
			current = Some(captures.into_iter().collect());
			stack.push(MatchFrame {
				line: root,
				indent: line.indent,
				child_indent: None,
			});
		}
	}

	if let Some(finished) = current.take() {
		records.push(finished);
	}

	if records.is_empty() {
		return Err(CfgError::NoMatch);
	}

	tracing::debug!(records = records.len(), "extracted records");
	Ok(records)
}

fn first_match(
	candidates: &[usize],
	matchers: &[LineMatcher],
	content: &str,
) -> Option<(usize, Vec<(String, String)>)> {
	candidates.iter().find_map(|&index| {
		matchers[index]
			.captures(content)
			.map(|captures| (index, captures))
	})
}
