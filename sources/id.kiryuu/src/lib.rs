#![no_std]
use aidoku::{
	alloc::String,
	imports::{html::Element, std::current_date},
	prelude::*,
	Chapter, DeepLinkHandler, ImageRequestProvider, ListingProvider, Source,
};
use mangathemesia::{first_number, parse_date, Impl, MangaThemesia, Params};

const BASE_URL: &str = "https://kiryuu.id";

// indonesian month names in chrono's %B position
const MONTHS: [(&str, &str); 12] = [
	("Januari", "January"),
	("Februari", "February"),
	("Maret", "March"),
	("April", "April"),
	("Mei", "May"),
	("Juni", "June"),
	("Juli", "July"),
	("Agustus", "August"),
	("September", "September"),
	("Oktober", "October"),
	("November", "November"),
	("Desember", "December"),
];

struct Kiryuu;

impl Impl for Kiryuu {
	fn new() -> Self {
		Self
	}

	fn params(&self) -> Params {
		Params {
			base_url: BASE_URL.into(),
			..Default::default()
		}
	}

	fn parse_chapter_element(&self, params: &Params, element: Element) -> Option<Chapter> {
		let link = element.select_first("a")?;
		let url = link.attr("abs:href")?;
		let key = url
			.strip_prefix(params.base_url.as_ref())
			.map(String::from)
			.unwrap_or_else(|| url.clone());
		let title = link
			.select_first(".chapternum")
			.and_then(|el| el.text())
			.or_else(|| link.text());
		let chapter_number = element
			.attr("data-num")
			.as_deref()
			.or(title.as_deref())
			.and_then(first_number);
		let date_uploaded = element
			.select_first(".chapterdate")
			.and_then(|el| el.text())
			.and_then(|date| parse_indonesian_date(&date, current_date()));
		Some(Chapter {
			key,
			title,
			chapter_number,
			date_uploaded,
			url: Some(url),
			..Default::default()
		})
	}
}

// handles both absolute indonesian dates and "... yang lalu" relative ones
fn parse_indonesian_date(date: &str, now: i64) -> Option<i64> {
	let date = date.trim();

	if date == "baru saja" {
		return Some(now);
	}

	if date.ends_with("lalu") {
		let number = first_number(date)? as i64;
		let seconds = if date.contains("detik") {
			1
		} else if date.contains("menit") {
			60
		} else if date.contains("jam") {
			3600
		} else if date.contains("hari") {
			86400
		} else if date.contains("minggu") {
			604800
		} else if date.contains("bulan") {
			2_592_000
		} else if date.contains("tahun") {
			31_536_000
		} else {
			return None;
		};
		return Some(now - number * seconds);
	}

	let mut date = String::from(date);
	for (id, en) in MONTHS {
		if date.contains(id) {
			date = date.replace(id, en);
			break;
		}
	}
	parse_date("%B %d, %Y", &date)
}

register_source!(
	MangaThemesia<Kiryuu>,
	ListingProvider,
	ImageRequestProvider,
	DeepLinkHandler
);

#[cfg(test)]
mod test {
	use super::*;
	use aidoku_test::aidoku_test;

	const NOW: i64 = 1709337600;

	#[aidoku_test]
	fn absolute_dates() {
		assert_eq!(parse_indonesian_date("Maret 2, 2024", NOW), Some(NOW));
		assert_eq!(
			parse_indonesian_date("Agustus 17, 2023", NOW),
			Some(1692230400)
		);
	}

	#[aidoku_test]
	fn relative_dates() {
		assert_eq!(parse_indonesian_date("baru saja", NOW), Some(NOW));
		assert_eq!(
			parse_indonesian_date("3 hari yang lalu", NOW),
			Some(NOW - 3 * 86400)
		);
		assert_eq!(
			parse_indonesian_date("2 minggu yang lalu", NOW),
			Some(NOW - 2 * 604800)
		);
	}

	#[aidoku_test]
	fn unparseable_dates() {
		assert_eq!(parse_indonesian_date("segera", NOW), None);
	}
}
