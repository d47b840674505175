use aidoku::alloc::{String, Vec};
use serde::Deserialize;

// response for /query
#[derive(Default, Deserialize)]
pub struct QueryResponse {
	#[serde(default)]
	pub data: Vec<SeriesItem>,
	#[serde(default)]
	pub meta: PageMeta,
}

#[derive(Default, Deserialize)]
pub struct SeriesItem {
	pub title: String,
	pub series_slug: String,
	#[serde(default)]
	pub thumbnail: String,
}

// response for /series/<slug>
#[derive(Default, Deserialize)]
pub struct SeriesResponse {
	pub id: i32,
	pub title: String,
	pub series_slug: String,
	#[serde(default)]
	pub thumbnail: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub author: Option<String>,
	#[serde(default)]
	pub studio: Option<String>,
	#[serde(default)]
	pub status: String,
	#[serde(default)]
	pub tags: Vec<Tag>,
}

#[derive(Default, Deserialize)]
pub struct Tag {
	pub name: String,
}

// response for /chapter/query
#[derive(Default, Deserialize)]
pub struct ChapterResponse {
	#[serde(default)]
	pub data: Vec<ChapterItem>,
	#[serde(default)]
	pub meta: PageMeta,
}

#[derive(Default, Deserialize)]
pub struct ChapterItem {
	pub chapter_slug: String,
	#[serde(default)]
	pub chapter_name: Option<String>,
	#[serde(default)]
	pub chapter_title: Option<String>,
	#[serde(default)]
	pub price: i32,
	#[serde(default)]
	pub created_at: String,
}

#[derive(Default, Deserialize)]
pub struct PageMeta {
	#[serde(default = "one")]
	pub first_page: i32,
	#[serde(default = "one")]
	pub last_page: i32,
}

fn one() -> i32 {
	1
}

// response for /chapter/<series>/<chapter>
#[derive(Default, Deserialize)]
pub struct PageListResponse {
	#[serde(default)]
	pub data: Vec<String>,
	#[serde(default)]
	pub chapter: Option<ChapterDetail>,
}

#[derive(Default, Deserialize)]
pub struct ChapterDetail {
	#[serde(default)]
	pub chapter_data: Option<ChapterData>,
}

#[derive(Default, Deserialize)]
pub struct ChapterData {
	#[serde(default)]
	pub images: Vec<String>,
}

impl PageListResponse {
	// images land either at the top level or nested under chapter_data
	pub fn into_images(self) -> Vec<String> {
		if !self.data.is_empty() {
			return self.data;
		}
		self.chapter
			.and_then(|chapter| chapter.chapter_data)
			.map(|data| data.images)
			.unwrap_or_default()
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use aidoku_test::aidoku_test;

	#[aidoku_test]
	fn query_response_decode() {
		let response = serde_json::from_str::<QueryResponse>(
			r#"{"data":[{"id":12,"title":"Solo Grinding","series_slug":"solo-grinding","thumbnail":"https://cdn.example.org/cover.webp"}],"meta":{"total":120,"first_page":1,"last_page":12}}"#,
		)
		.unwrap();
		assert_eq!(response.data.len(), 1);
		assert_eq!(response.data[0].series_slug, "solo-grinding");
		assert_eq!(response.meta.last_page, 12);
	}

	#[aidoku_test]
	fn chapter_response_defaults() {
		let response = serde_json::from_str::<ChapterResponse>(
			r#"{"data":[{"chapter_slug":"chapter-10","created_at":"2024-03-02T00:00:00.000Z"}]}"#,
		)
		.unwrap();
		assert_eq!(response.data[0].price, 0);
		assert_eq!(response.data[0].chapter_name, None);
		assert_eq!(response.meta.first_page, 1);
		assert_eq!(response.meta.last_page, 1);
	}

	#[aidoku_test]
	fn page_list_images_top_level() {
		let response = serde_json::from_str::<PageListResponse>(
			r#"{"data":["chapters/1/01.webp","chapters/1/02.webp"]}"#,
		)
		.unwrap();
		assert_eq!(response.into_images().len(), 2);
	}

	#[aidoku_test]
	fn page_list_images_nested() {
		let response = serde_json::from_str::<PageListResponse>(
			r#"{"chapter":{"chapter_data":{"images":["https://cdn.example.org/01.webp"]}}}"#,
		)
		.unwrap();
		assert_eq!(
			response.into_images(),
			["https://cdn.example.org/01.webp"]
		);
	}
}
