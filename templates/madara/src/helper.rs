use crate::Params;
use aidoku::{
	alloc::{string::ToString, String, Vec},
	helpers::uri::QueryParameters,
	imports::{html::Element, net::Request},
	prelude::*,
	FilterValue, Result,
};

pub trait ElementImageAttr {
	fn img_attr(&self, use_style: bool) -> Option<String>;
}

impl ElementImageAttr for Element {
	fn img_attr(&self, use_style: bool) -> Option<String> {
		if use_style {
			if let Some(url) = self
				.attr("style")
				.and_then(|style| extract_between(&style, "url(", ")").map(String::from))
			{
				return Some(url);
			}
		}
		self.attr("abs:data-src")
			.or_else(|| self.attr("abs:data-lazy-src"))
			.or_else(|| {
				self.attr("abs:srcset").and_then(|srcset| {
					// last candidate is the largest
					srcset
						.split(',')
						.next_back()
						.and_then(|s| s.split_whitespace().next())
						.map(String::from)
				})
			})
			.or_else(|| self.attr("abs:src"))
			.map(|s| s.trim().into())
	}
}

pub fn sort_value(index: i32) -> &'static str {
	match index {
		1 => "latest",
		2 => "alphabet",
		3 => "rating",
		4 => "trending",
		5 => "views",
		6 => "new-manga",
		_ => "",
	}
}

pub fn get_search_request(
	params: &Params,
	query: Option<String>,
	page: i32,
	filters: Vec<FilterValue>,
) -> Result<Request> {
	let mut qs = QueryParameters::new();
	qs.push("s", Some(&query.unwrap_or_default()));
	qs.push("post_type", Some("wp-manga"));
	for filter in filters {
		match filter {
			FilterValue::Sort { index, .. } => {
				qs.push("m_orderby", Some(sort_value(index)));
			}
			FilterValue::Select { id, value } => {
				qs.push(&id, Some(&value));
			}
			FilterValue::MultiSelect { id, included, .. } => {
				for genre in included {
					qs.push(&id, Some(&genre));
				}
			}
			FilterValue::Text { id, value } => {
				qs.push(&id, Some(&value));
			}
			_ => {}
		}
	}
	let path = if page > 1 {
		format!("/page/{page}/")
	} else {
		"/".into()
	};
	Ok(Request::get(format!("{}{path}?{qs}", params.base_url))?)
}

pub fn get_load_more_request(
	params: &Params,
	query: Option<String>,
	page: i32,
	filters: Vec<FilterValue>,
) -> Result<Request> {
	let mut form = QueryParameters::new();
	form.push("action", Some("madara_load_more"));
	form.push("page", Some(&(page - 1).to_string()));
	form.push("template", Some("madara-core/content/content-search"));
	form.push("vars[paged]", Some("1"));
	form.push("vars[template]", Some("archive"));
	form.push("vars[post_type]", Some("wp-manga"));
	form.push("vars[post_status]", Some("publish"));
	if let Some(query) = query {
		form.push("vars[s]", Some(&query));
	}
	for filter in filters {
		match filter {
			FilterValue::Sort { index, .. } => match sort_value(index) {
				"latest" => {
					form.push("vars[orderby]", Some("meta_value_num"));
					form.push("vars[meta_key]", Some("_latest_update"));
					form.push("vars[order]", Some("DESC"));
				}
				"views" => {
					form.push("vars[orderby]", Some("meta_value_num"));
					form.push("vars[meta_key]", Some("_wp_manga_views"));
					form.push("vars[order]", Some("DESC"));
				}
				"trending" => {
					form.push("vars[orderby]", Some("meta_value_num"));
					form.push("vars[meta_key]", Some("_wp_manga_week_views_value"));
					form.push("vars[order]", Some("DESC"));
				}
				"alphabet" => {
					form.push("vars[orderby]", Some("post_title"));
					form.push("vars[order]", Some("ASC"));
				}
				"new-manga" => {
					form.push("vars[orderby]", Some("date"));
					form.push("vars[order]", Some("DESC"));
				}
				_ => {}
			},
			FilterValue::MultiSelect { id, included, .. } => {
				if id == "genre[]" && !included.is_empty() {
					form.push("vars[tax_query][0][taxonomy]", Some("wp-manga-genre"));
					form.push("vars[tax_query][0][field]", Some("slug"));
					for (idx, slug) in included.iter().enumerate() {
						form.push(&format!("vars[tax_query][0][terms][{idx}]"), Some(slug));
					}
				}
			}
			_ => {}
		}
	}
	let url = format!("{}/wp-admin/admin-ajax.php", params.base_url);
	Ok(Request::post(url)?
		.body(form.to_string())
		.header("Content-Type", "application/x-www-form-urlencoded")
		.header("X-Requested-With", "XMLHttpRequest"))
}

// POST target for the new chapter endpoint
pub fn ajax_chapters_url(entry_url: &str) -> String {
	let url = entry_url.strip_suffix('/').unwrap_or(entry_url);
	format!("{url}/ajax/chapters")
}

// parses a chapter date string, trying the configured absolute format first,
// then relative phrasing, returning epoch 0 when nothing matches
pub fn parse_chapter_date(format: &str, date: &str, now: i64) -> i64 {
	let date = date.trim();

	if let Ok(parsed) = chrono::NaiveDate::parse_from_str(date, format) {
		if let Some(time) = parsed.and_hms_opt(0, 0, 0) {
			return time.and_utc().timestamp();
		}
	}

	let lowercased = date.to_lowercase();
	if lowercased.contains("today") || lowercased.contains("hoy") {
		return now;
	}
	if lowercased.contains("yesterday") || lowercased.contains("hier") || lowercased.contains("ayer")
	{
		return now - DAY;
	}

	parse_relative_date(&lowercased, now)
}

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

// parses a relative date string (e.g. "3 days ago", "il y a 2 heures"),
// returning epoch 0 when no known unit is present
pub fn parse_relative_date(date: &str, now: i64) -> i64 {
	let number = date
		.split_whitespace()
		.find_map(|word| word.parse::<i64>().ok())
		.unwrap_or(1);

	fn contains_any(haystack: &str, words: &[&str]) -> bool {
		words.iter().any(|word| haystack.contains(word))
	}

	let unit = if contains_any(date, &["sec", "segundo", "detik", "saniye"]) {
		1
	} else if contains_any(date, &["min", "menit", "dakika"]) {
		MINUTE
	} else if contains_any(date, &["hour", "heure", "hora", "jam", "saat"]) {
		HOUR
	} else if contains_any(date, &["day", "jour", "día", "dia", "hari", "gün"]) {
		DAY
	} else if contains_any(date, &["week", "semaine", "semana", "minggu", "hafta"]) {
		WEEK
	} else if contains_any(date, &["month", "mois", "mes", "bulan", "ay"]) {
		MONTH
	} else if contains_any(date, &["year", "année", "ano", "año", "tahun", "yıl"]) {
		YEAR
	} else {
		return 0;
	};

	now - number * unit
}

// extracts the first number in a string, handling decimals (e.g. "Chapter 10.5")
pub fn first_number(s: &str) -> Option<f32> {
	let mut number = String::new();
	let mut seen_dot = false;
	for c in s.chars() {
		if c.is_ascii_digit() {
			number.push(c);
		} else if c == '.' && !number.is_empty() && !seen_dot {
			number.push(c);
			seen_dot = true;
		} else if !number.is_empty() {
			break;
		}
	}
	number.trim_end_matches('.').parse::<f32>().ok()
}

pub fn extract_between<'a>(s: &'a str, start: &str, end: &str) -> Option<&'a str> {
	let from = s.find(start)? + start.len();
	let rest = &s[from..];
	rest.find(end).map(|to| &rest[..to])
}

pub fn decode_hex(s: &str) -> Option<Vec<u8>> {
	if s.len() % 2 != 0 {
		return None;
	}
	let bytes = s.as_bytes();
	let mut out = Vec::with_capacity(s.len() / 2);
	for pair in bytes.chunks(2) {
		let hi = (pair[0] as char).to_digit(16)?;
		let lo = (pair[1] as char).to_digit(16)?;
		out.push(((hi << 4) | lo) as u8);
	}
	Some(out)
}

#[cfg(test)]
mod test {
	use super::*;
	use aidoku_test::aidoku_test;

	#[aidoku_test]
	fn absolute_dates() {
		assert_eq!(parse_chapter_date("%B %d, %Y", "March 1, 2024", 0), 1709251200);
		assert_eq!(parse_chapter_date("%B %d, %Y", "March 2, 2024", 0), 1709337600);
		assert_eq!(
			parse_chapter_date("%d/%m/%Y", " 02/03/2024 ", 0),
			1709337600
		);
	}

	#[aidoku_test]
	fn newer_dates_sort_first() {
		let older = parse_chapter_date("%B %d, %Y", "March 1, 2024", 0);
		let newer = parse_chapter_date("%B %d, %Y", "March 2, 2024", 0);
		assert!(newer > older);
	}

	#[aidoku_test]
	fn ajax_chapter_urls() {
		assert_eq!(
			ajax_chapters_url("https://example.org/manga/some-title/"),
			"https://example.org/manga/some-title/ajax/chapters"
		);
		assert_eq!(
			ajax_chapters_url("https://example.org/manga/some-title"),
			"https://example.org/manga/some-title/ajax/chapters"
		);
	}

	#[aidoku_test]
	fn chapter_rows_stay_newest_first() {
		use aidoku::Chapter;
		let chapters = ["March 2, 2024", "March 1, 2024"]
			.iter()
			.map(|date| Chapter {
				date_uploaded: Some(parse_chapter_date("%B %d, %Y", date, 0)),
				..Default::default()
			})
			.collect::<Vec<_>>();
		assert_eq!(chapters[0].date_uploaded, Some(1709337600));
		assert_eq!(chapters[1].date_uploaded, Some(1709251200));
		assert!(chapters
			.windows(2)
			.all(|pair| pair[0].date_uploaded >= pair[1].date_uploaded));
	}

	#[aidoku_test]
	fn relative_dates() {
		let now = 1_700_000_000;
		assert_eq!(parse_chapter_date("%B %d, %Y", "3 days ago", now), now - 3 * DAY);
		assert_eq!(
			parse_chapter_date("%B %d, %Y", "il y a 2 heures", now),
			now - 2 * HOUR
		);
		assert_eq!(parse_chapter_date("%B %d, %Y", "hace 5 minutos", now), now - 5 * MINUTE);
		assert_eq!(parse_chapter_date("%B %d, %Y", "yesterday", now), now - DAY);
		assert_eq!(parse_chapter_date("%B %d, %Y", "today", now), now);
	}

	#[aidoku_test]
	fn unparseable_dates_default_to_epoch() {
		assert_eq!(parse_chapter_date("%B %d, %Y", "1 mars 2024", 1_700_000_000), 0);
		assert_eq!(parse_chapter_date("%B %d, %Y", "", 1_700_000_000), 0);
	}

	#[aidoku_test]
	fn chapter_numbers() {
		assert_eq!(first_number("Chapter 23"), Some(23.0));
		assert_eq!(first_number("Chapter 10.5 - The End"), Some(10.5));
		assert_eq!(first_number("Ch. 4: Title"), Some(4.0));
		assert_eq!(first_number("Chapter 12."), Some(12.0));
		assert_eq!(first_number("Extra"), None);
	}

	#[aidoku_test]
	fn extraction() {
		assert_eq!(
			extract_between("background-image: url(https://a.com/x.jpg);", "url(", ")"),
			Some("https://a.com/x.jpg")
		);
		assert_eq!(extract_between("no match", "url(", ")"), None);
	}

	#[aidoku_test]
	fn hex_decoding() {
		use aidoku::alloc::vec;
		assert_eq!(decode_hex("00ff10"), Some(vec![0, 255, 16]));
		assert_eq!(decode_hex("0f"), Some(vec![15]));
		assert_eq!(decode_hex("abc"), None);
		assert_eq!(decode_hex("zz"), None);
	}
}
