use derive_more::Deref;

use crate::CfgError;
use crate::CfgResult;
use crate::lexer::tokenize_line;
use crate::scanner::indent_width;
use crate::scanner::normalize_line_endings;
use crate::tokens::Segment;

/// A single compiled line of an extraction template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateLine {
	/// Width of the leading whitespace in the template text.
	pub indent: usize,
	/// Alternating literal and placeholder segments, in line order.
	pub segments: Vec<Segment>,
	/// Index of the nearest preceding line with a strictly smaller indent.
	pub parent: Option<usize>,
	/// Indices of the lines whose parent is this line, in template order.
	pub children: Vec<usize>,
	/// 1-indexed line number within the template text.
	pub number: usize,
}

impl TemplateLine {
	pub fn is_root(&self) -> bool {
		self.parent.is_none()
	}

	/// Placeholder names on this line, in order of appearance.
	pub fn placeholders(&self) -> impl Iterator<Item = &str> {
		self.segments.iter().filter_map(Segment::placeholder_name)
	}
}

/// An extraction template compiled into an indentation tree.
///
/// Lines keep their template order. Each line points at its parent, which is
/// the nearest preceding line with a strictly smaller indent; lines without
/// such a predecessor are roots.
#[derive(Debug, Clone, Deref)]
pub struct CompiledTemplate {
	#[deref]
	lines: Vec<TemplateLine>,
	fields: Vec<String>,
}

impl CompiledTemplate {
	/// Compile template text. Blank lines are skipped.
	pub fn compile(text: impl AsRef<str>) -> CfgResult<Self> {
		let text = normalize_line_endings(text.as_ref());
		let mut lines: Vec<TemplateLine> = Vec::new();
		// Indices of the lines that can still be a parent, shallowest first.
		let mut open: Vec<usize> = Vec::new();

		for (index, raw) in text.lines().enumerate() {
			let content = raw.trim();
			if content.is_empty() {
				continue;
			}

			let number = index + 1;
			let indent = indent_width(raw);
			let leading = raw.len() - raw.trim_start().len();
			let segments = tokenize_line(content, number, leading)?;

			while let Some(&last) = open.last() {
				if lines[last].indent >= indent {
					open.pop();
				} else {
					break;
				}
			}

			let parent = open.last().copied();
			let position = lines.len();
			if let Some(parent) = parent {
				lines[parent].children.push(position);
			}

			lines.push(TemplateLine {
				indent,
				segments,
				parent,
				children: Vec::new(),
				number,
			});
			open.push(position);
		}

		if lines.is_empty() {
			return Err(CfgError::Compile {
				line: 1,
				column: 1,
				message: "template contains no lines".to_string(),
			});
		}

		let mut fields: Vec<String> = Vec::new();
		for name in lines.iter().flat_map(TemplateLine::placeholders) {
			if !fields.iter().any(|field| field == name) {
				fields.push(name.to_string());
			}
		}

		tracing::debug!(
			lines = lines.len(),
			fields = fields.len(),
			"compiled extraction template"
		);

		Ok(Self { lines, fields })
	}

	/// Indices of the root lines, in template order.
	pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
		self.lines
			.iter()
			.enumerate()
			.filter(|(_, line)| line.is_root())
			.map(|(index, _)| index)
	}

	/// Every placeholder name in the template, deduplicated, in order of
	/// first appearance. Extracted records only ever carry these fields.
	pub fn field_names(&self) -> &[String] {
		&self.fields
	}
}

/// Compile an extraction template.
pub fn compile_template(text: impl AsRef<str>) -> CfgResult<CompiledTemplate> {
	CompiledTemplate::compile(text)
}
