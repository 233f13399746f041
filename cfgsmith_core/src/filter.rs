use serde::Deserialize;
use serde::Serialize;

use crate::Record;

/// Prefixes that exclude a record when any of its field values starts with
/// one of them. Comparison is exact and case-sensitive.
///
/// Empty strings are dropped on construction, so an empty prefix never
/// excludes every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct IgnorePrefixes(Vec<String>);

impl IgnorePrefixes {
	pub fn new<I, S>(prefixes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self(
			prefixes
				.into_iter()
				.map(Into::into)
				.filter(|prefix| !prefix.is_empty())
				.collect(),
		)
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Whether any field value of `record` starts with any prefix.
	pub fn excludes(&self, record: &Record) -> bool {
		record
			.values()
			.any(|value| self.0.iter().any(|prefix| value.starts_with(prefix.as_str())))
	}
}

impl From<Vec<String>> for IgnorePrefixes {
	fn from(prefixes: Vec<String>) -> Self {
		Self::new(prefixes)
	}
}

impl From<IgnorePrefixes> for Vec<String> {
	fn from(prefixes: IgnorePrefixes) -> Self {
		prefixes.0
	}
}

/// Records split into the ones to render and the ones excluded by an ignore
/// prefix. Each side keeps extraction order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
	pub kept: Vec<Record>,
	pub ignored: Vec<Record>,
}

/// Partition records by ignore prefix without mutating the input order.
pub fn partition(records: Vec<Record>, prefixes: &IgnorePrefixes) -> Partition {
	if prefixes.is_empty() {
		return Partition {
			kept: records,
			ignored: Vec::new(),
		};
	}

	let (ignored, kept): (Vec<Record>, Vec<Record>) = records
		.into_iter()
		.partition(|record| prefixes.excludes(record));

	tracing::debug!(
		kept = kept.len(),
		ignored = ignored.len(),
		"filtered records"
	);

	Partition { kept, ignored }
}
