use crate::CfgError;
use crate::CfgResult;
use crate::Record;
use crate::lexer::tokenize_output_line;
use crate::tokens::Segment;

/// An output template split into literal text and `{{ name }}` placeholders.
///
/// Only placeholders are interpreted. Everything else, including `{%`, `{#`
/// and lone braces, is copied through exactly as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTemplate {
	segments: Vec<Segment>,
	fields: Vec<String>,
}

impl OutputTemplate {
	/// Split `text` into segments. Malformed placeholders fail with
	/// [`CfgError::Render`].
	pub fn parse(text: &str) -> CfgResult<Self> {
		let mut segments: Vec<Segment> = Vec::new();

		for (index, line) in text.split_inclusive('\n').enumerate() {
			let line_segments = tokenize_output_line(line, index + 1).map_err(|e| {
				match e {
					CfgError::Compile {
						line,
						column,
						message,
					} => {
						CfgError::Render(format!(
							"output template line {line}, column {column}: {message}"
						))
					}
					other => other,
				}
			})?;

			for segment in line_segments {
				if let (Some(Segment::Literal(tail)), Segment::Literal(more)) =
					(segments.last_mut(), &segment)
				{
					tail.push_str(more);
					continue;
				}
				segments.push(segment);
			}
		}

		let mut fields: Vec<String> = Vec::new();
		for name in segments.iter().filter_map(Segment::placeholder_name) {
			if !fields.iter().any(|field| field == name) {
				fields.push(name.to_string());
			}
		}

		Ok(Self { segments, fields })
	}

	/// Placeholder names in order of first appearance.
	pub fn field_names(&self) -> &[String] {
		&self.fields
	}

	/// Substitute every placeholder with the record's value. `index` is the
	/// record's position, reported when a field is missing.
	pub fn render(&self, record: &Record, index: usize) -> CfgResult<String> {
		let mut rendered = String::new();

		for segment in &self.segments {
			match segment {
				Segment::Literal(text) => rendered.push_str(text),
				Segment::Placeholder(name) => {
					let value = record.get(name).ok_or_else(|| {
						CfgError::MissingField {
							field: name.clone(),
							record: index,
						}
					})?;
					rendered.push_str(value);
				}
			}
		}

		Ok(rendered)
	}
}

/// Render every record through `output_template` and join the results with a
/// single newline, in record order.
///
/// Rendering is strict: a placeholder that names a field the record does not
/// carry fails with [`CfgError::MissingField`] rather than rendering empty.
/// With no records the output template is returned unchanged.
pub fn render_records(output_template: &str, records: &[Record]) -> CfgResult<String> {
	if records.is_empty() {
		tracing::debug!("no records to render, returning the output template verbatim");
		return Ok(output_template.to_string());
	}

	let template = OutputTemplate::parse(output_template)?;
	let parts = records
		.iter()
		.enumerate()
		.map(|(index, record)| template.render(record, index))
		.collect::<CfgResult<Vec<_>>>()?;

	tracing::debug!(
		records = parts.len(),
		fields = template.field_names().len(),
		"rendered output template"
	);
	Ok(parts.join("\n"))
}
