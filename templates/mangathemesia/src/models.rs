use aidoku::alloc::{String, Vec};
use serde::Deserialize;

// argument object passed to ts_reader.run(...) on chapter pages
#[derive(Default, Deserialize, Debug, Clone)]
pub struct ReaderSettings {
	pub sources: Vec<ReaderSource>,
}

#[derive(Default, Deserialize, Debug, Clone)]
pub struct ReaderSource {
	#[serde(default)]
	pub source: String,
	pub images: Vec<String>,
}

#[cfg(test)]
mod test {
	use super::*;
	use aidoku_test::aidoku_test;

	#[aidoku_test]
	fn reader_settings_decode() {
		let settings = serde_json::from_str::<ReaderSettings>(
			r#"{"post_id":1234,"prevUrl":"","nextUrl":"https://example.org/title-chapter-2/","sources":[{"source":"Server 1","images":["https://cdn.example.org/1.jpg","https://cdn.example.org/2.jpg"]}]}"#,
		)
		.unwrap();
		assert_eq!(settings.sources.len(), 1);
		assert_eq!(settings.sources[0].source, "Server 1");
		assert_eq!(
			settings.sources[0].images,
			["https://cdn.example.org/1.jpg", "https://cdn.example.org/2.jpg"]
		);
	}

	#[aidoku_test]
	fn reader_settings_missing_source_name() {
		let settings = serde_json::from_str::<ReaderSettings>(
			r#"{"sources":[{"images":["https://cdn.example.org/1.jpg"]}]}"#,
		)
		.unwrap();
		assert_eq!(settings.sources[0].source, "");
		assert_eq!(settings.sources[0].images.len(), 1);
	}
}
