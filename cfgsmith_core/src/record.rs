use serde::Serialize;
use serde::ser::SerializeMap;

/// Named captures produced by one root match and the children matched under
/// it. Fields keep the order in which they were first captured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
	fields: Vec<(String, String)>,
}

impl Record {
	pub fn new() -> Self {
		Self::default()
	}

	/// Set a field. An existing field keeps its position and takes the new
	/// value.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
		let name = name.into();
		let value = value.into();

		if let Some(slot) = self.fields.iter_mut().find(|(key, _)| *key == name) {
			slot.1 = value;
		} else {
			self.fields.push((name, value));
		}
	}

	/// Merge captured fields into this record, later values winning.
	pub fn merge(&mut self, captures: impl IntoIterator<Item = (String, String)>) {
		for (name, value) in captures {
			self.insert(name, value);
		}
	}

	pub fn get(&self, name: &str) -> Option<&str> {
		self.fields
			.iter()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value.as_str())
	}

	pub fn contains(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	pub fn len(&self) -> usize {
		self.fields.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	pub fn values(&self) -> impl Iterator<Item = &str> {
		self.fields.iter().map(|(_, value)| value.as_str())
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.fields
			.iter()
			.map(|(key, value)| (key.as_str(), value.as_str()))
	}
}

impl<K, V> FromIterator<(K, V)> for Record
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut record = Record::new();
		for (name, value) in iter {
			record.insert(name, value);
		}
		record
	}
}

impl Serialize for Record {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		let mut map = serializer.serialize_map(Some(self.fields.len()))?;
		for (name, value) in &self.fields {
			map.serialize_entry(name, value)?;
		}
		map.end()
	}
}
