use aidoku::{
	alloc::{String, Vec},
	helpers::uri::QueryParameters,
	prelude::*,
	FilterValue,
};

pub fn search_url(base_url: &str, query: Option<String>, filters: Vec<FilterValue>, page: i32) -> String {
	let mut qs = QueryParameters::new();
	qs.push("q", Some(&query.unwrap_or_default()));
	let mut kind = String::new();
	let mut status = String::new();
	for filter in filters {
		match filter {
			FilterValue::Select { id, value } => match id.as_str() {
				"type" => kind = value,
				"status" => status = value,
				_ => {}
			},
			FilterValue::MultiSelect { id, included, .. } if id == "genre" => {
				for genre in included {
					qs.push("genre", Some(&genre));
				}
			}
			_ => {}
		}
	}
	qs.push("type", Some(&kind));
	qs.push("status", Some(&status));
	qs.push("page", Some(&format!("{page}")));
	format!("{base_url}/search?{qs}")
}

// chapter links read "Chapter 63" or "Chapter 63.5"
pub fn chapter_number(title: &str) -> Option<f32> {
	title
		.rsplit(' ')
		.next()
		.and_then(|num| num.parse::<f32>().ok())
}

#[cfg(test)]
mod test {
	use super::*;
	use aidoku::alloc::vec;
	use aidoku_test::aidoku_test;

	#[aidoku_test]
	fn search_urls() {
		assert_eq!(
			search_url("https://mangapill.com", Some("one piece".into()), Vec::new(), 1),
			"https://mangapill.com/search?q=one%20piece&type=&status=&page=1"
		);
		assert_eq!(
			search_url(
				"https://mangapill.com",
				None,
				vec![FilterValue::Select {
					id: "type".into(),
					value: "manhwa".into()
				}],
				2
			),
			"https://mangapill.com/search?q=&type=manhwa&status=&page=2"
		);
	}

	#[aidoku_test]
	fn chapter_numbers() {
		assert_eq!(chapter_number("Chapter 63"), Some(63.0));
		assert_eq!(chapter_number("Chapter 63.5"), Some(63.5));
		assert_eq!(chapter_number("Oneshot"), None);
	}
}
