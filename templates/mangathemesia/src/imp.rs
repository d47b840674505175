use super::Params;
use crate::models::ReaderSettings;
use aidoku::{
	alloc::{String, Vec},
	helpers::uri::QueryParameters,
	imports::{
		html::{Document, Element},
		net::Request,
		std::send_partial_result,
	},
	prelude::*,
	Chapter, ContentRating, DeepLinkResult, FilterValue, Listing, Manga, MangaPageResult,
	MangaStatus, Page, PageContent, PageContext, Result, Viewer,
};

pub trait Impl {
	fn new() -> Self;

	fn params(&self) -> Params;

	fn get_manga_list(
		&self,
		params: &Params,
		listing: Listing,
		page: i32,
	) -> Result<MangaPageResult> {
		let order = match listing.id.as_str() {
			"popular" => "popular",
			"latest" => "update",
			_ => bail!("Invalid listing"),
		};
		let url = format!(
			"{}{}/?page={page}&order={order}",
			params.base_url, params.directory_path
		);
		let html = self.modify_request(params, Request::get(url)?)?.html()?;
		Ok(self.parse_directory(params, &html))
	}

	fn get_search_manga_list(
		&self,
		params: &Params,
		query: Option<String>,
		page: i32,
		filters: Vec<FilterValue>,
	) -> Result<MangaPageResult> {
		let mut qs = QueryParameters::new();
		qs.push("page", Some(&format!("{page}")));
		if let Some(query) = query {
			qs.push("title", Some(&query));
		}
		for filter in filters {
			match filter {
				FilterValue::Sort { index, .. } => {
					let order = match index {
						1 => "update",
						2 => "title",
						3 => "titlereverse",
						4 => "latest",
						_ => "popular",
					};
					qs.push("order", Some(order));
				}
				FilterValue::Select { id, value } => {
					qs.push(&id, Some(&value));
				}
				FilterValue::MultiSelect { id, included, .. } => {
					for value in included {
						qs.push(&id, Some(&value));
					}
				}
				_ => {}
			}
		}
		let url = format!("{}{}/?{qs}", params.base_url, params.directory_path);
		let html = self.modify_request(params, Request::get(url)?)?.html()?;
		Ok(self.parse_directory(params, &html))
	}

	fn parse_directory(&self, params: &Params, html: &Document) -> MangaPageResult {
		let entries = html
			.select(&params.item_selector)
			.map(|els| {
				els.filter_map(|el| {
					let link = el.select_first("a")?;
					let url = link.attr("abs:href")?;
					let key = url
						.strip_prefix(params.base_url.as_ref())
						.map(String::from)
						.unwrap_or(url);
					let title = link
						.attr("title")
						.or_else(|| el.select_first(".tt, .title")?.text())?;
					let cover = el.select_first("img").and_then(|img| {
						img.attr("abs:data-src").or_else(|| img.attr("abs:src"))
					});
					Some(Manga {
						key,
						title,
						cover,
						..Default::default()
					})
				})
				.collect::<Vec<_>>()
			})
			.unwrap_or_default();

		let has_next_page = html
			.select_first("div.pagination .next, div.hpage a.r, a.next.page-numbers")
			.is_some();

		MangaPageResult {
			entries,
			has_next_page,
		}
	}

	fn get_manga_update(
		&self,
		params: &Params,
		mut manga: Manga,
		needs_details: bool,
		needs_chapters: bool,
	) -> Result<Manga> {
		let url = format!("{}{}", params.base_url, manga.key);
		let html = self.modify_request(params, Request::get(&url)?)?.html()?;

		if needs_details {
			manga.title = html
				.select_first(&params.details_title_selector)
				.and_then(|el| el.text())
				.map(|title| title.trim().trim_end_matches("Bahasa Indonesia").trim().into())
				.unwrap_or(manga.title);
			manga.cover = html
				.select_first(&params.details_cover_selector)
				.and_then(|img| img.attr("abs:src"))
				.or(manga.cover);
			manga.authors = html
				.select(&params.details_author_selector)
				.map(|els| els.filter_map(|el| el.text()).collect::<Vec<String>>());
			manga.artists = html
				.select(&params.details_artist_selector)
				.map(|els| els.filter_map(|el| el.text()).collect::<Vec<String>>());
			manga.description = html
				.select_first(&params.details_description_selector)
				.and_then(|el| el.text())
				.map(|text| text.trim().into());
			manga.tags = html
				.select(&params.details_genre_selector)
				.map(|els| els.filter_map(|el| el.text()).collect());
			manga.url = Some(url.clone());
			manga.status = html
				.select_first(&params.details_status_selector)
				.and_then(|el| el.text())
				.map(|text| match text.trim().to_lowercase().as_str() {
					"ongoing" | "berjalan" | "en cours" => MangaStatus::Ongoing,
					"completed" | "tamat" | "terminé" => MangaStatus::Completed,
					"hiatus" => MangaStatus::Hiatus,
					"dropped" | "cancelled" | "canceled" => MangaStatus::Cancelled,
					_ => MangaStatus::Unknown,
				})
				.unwrap_or_default();

			let kind = html
				.select_first(&params.details_type_selector)
				.and_then(|el| el.text())
				.unwrap_or_default();
			manga.viewer = match kind.trim().to_lowercase().as_str() {
				"manhwa" | "manhua" => Viewer::Webtoon,
				"manga" => Viewer::RightToLeft,
				_ => params.default_viewer,
			};

			let tags = manga.tags.as_deref().unwrap_or(&[]);
			manga.content_rating = if tags
				.iter()
				.any(|tag| matches!(tag.as_str(), "Adult" | "Mature" | "Smut"))
			{
				ContentRating::NSFW
			} else if tags.iter().any(|tag| tag == "Ecchi") {
				ContentRating::Suggestive
			} else {
				ContentRating::Safe
			};

			if needs_chapters {
				send_partial_result(&manga);
			}
		}

		if needs_chapters {
			// rows are listed newest first; keep that order
			manga.chapters = html.select(&params.chapter_selector).map(|els| {
				els.filter_map(|el| self.parse_chapter_element(params, el))
					.collect()
			});
		}

		Ok(manga)
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
			.and_then(|date| parse_date(&params.date_format, &date));
		Some(Chapter {
			key,
			title,
			chapter_number,
			date_uploaded,
			url: Some(url),
			..Default::default()
		})
	}

	fn get_page_list(&self, params: &Params, _manga: Manga, chapter: Chapter) -> Result<Vec<Page>> {
		let url = format!("{}{}", params.base_url, chapter.key);
		let html = self.modify_request(params, Request::get(url)?)?.html()?;

		// page urls are embedded in a ts_reader.run({...}) script
		let reader = html
			.select("script")
			.and_then(|scripts| {
				scripts.filter_map(|el| el.html()).find_map(|script| {
					let json = script
						.find("ts_reader.run(")
						.map(|start| &script[start + "ts_reader.run(".len()..])?;
					let json = &json[..json.rfind(");")?];
					serde_json::from_str::<ReaderSettings>(json).ok()
				})
			})
			.and_then(|settings| settings.sources.into_iter().next());

		if let Some(source) = reader {
			return Ok(source
				.images
				.into_iter()
				.map(|url| Page {
					content: PageContent::url(url),
					..Default::default()
				})
				.collect());
		}

		// fall back to the rendered reader for sites without the script blob
		Ok(html
			.select(&params.page_selector)
			.map(|els| {
				els.filter_map(|el| {
					let image = el.attr("abs:data-src").or_else(|| el.attr("abs:src"))?;
					Some(Page {
						content: PageContent::url(image.trim()),
						..Default::default()
					})
				})
				.collect::<Vec<_>>()
			})
			.unwrap_or_default())
	}

	fn get_image_request(
		&self,
		params: &Params,
		url: String,
		_context: Option<PageContext>,
	) -> Result<Request> {
		self.modify_request(
			params,
			Request::get(url)?.header("Referer", &format!("{}/", params.base_url)),
		)
	}

	fn handle_deep_link(&self, params: &Params, url: String) -> Result<Option<DeepLinkResult>> {
		let Some(path) = url.strip_prefix(params.base_url.as_ref()) else {
			return Ok(None);
		};

		let prefix = format!("{}/", params.directory_path);
		if path.starts_with(&prefix) {
			// ex: {base}/manga/some-title/
			Ok(Some(DeepLinkResult::Manga { key: path.into() }))
		} else {
			Ok(None)
		}
	}

	fn modify_request(&self, _params: &Params, request: Request) -> Result<Request> {
		Ok(request)
	}
}

// extracts the first number in a string, handling decimals
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

// parses an absolute chapter date with the configured chrono format
pub fn parse_date(format: &str, date: &str) -> Option<i64> {
	chrono::NaiveDate::parse_from_str(date.trim(), format)
		.ok()?
		.and_hms_opt(0, 0, 0)
		.map(|time| time.and_utc().timestamp())
}

#[cfg(test)]
mod test {
	use super::*;
	use aidoku_test::aidoku_test;

	#[aidoku_test]
	fn date_parsing() {
		assert_eq!(parse_date("%B %d, %Y", "March 2, 2024"), Some(1709337600));
		assert_eq!(parse_date("%B %d, %Y", " January 1, 2020 "), Some(1577836800));
		assert_eq!(parse_date("%B %d, %Y", "2 Maret 2024"), None);
	}

	#[aidoku_test]
	fn chapter_numbers() {
		assert_eq!(first_number("172"), Some(172.0));
		assert_eq!(first_number("Chapter 5.5"), Some(5.5));
		assert_eq!(first_number("N/A"), None);
	}
}
