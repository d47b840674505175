use super::Params;
use crate::models::{ChapterResponse, PageListResponse, QueryResponse, SeriesResponse};
use aidoku::{
	alloc::{string::ToString, vec, String, Vec},
	imports::{defaults::defaults_get, net::Request, std::send_partial_result},
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
		let order_by = match listing.id.as_str() {
			"popular" => "total_views",
			"latest" => "latest",
			_ => bail!("Invalid listing"),
		};
		self.query_series(params, "", order_by, &[], page)
	}

	fn get_search_manga_list(
		&self,
		params: &Params,
		query: Option<String>,
		page: i32,
		filters: Vec<FilterValue>,
	) -> Result<MangaPageResult> {
		let mut order_by = "total_views";
		let mut tag_ids: Vec<String> = Vec::new();
		for filter in filters {
			match filter {
				FilterValue::Sort { index, .. } => {
					order_by = match index {
						1 => "latest",
						2 => "created_at",
						3 => "title",
						_ => "total_views",
					};
				}
				FilterValue::MultiSelect { included, .. } => {
					tag_ids.extend(included);
				}
				_ => {}
			}
		}
		self.query_series(params, &query.unwrap_or_default(), order_by, &tag_ids, page)
	}

	fn query_series(
		&self,
		params: &Params,
		query: &str,
		order_by: &str,
		tag_ids: &[String],
		page: i32,
	) -> Result<MangaPageResult> {
		let url = format!(
			"{}/query?query_string={}&order=desc&orderBy={order_by}&series_type=Comic&page={page}&perPage=20&tags_ids=[{}]&adult=true",
			params.api_url,
			aidoku::helpers::uri::encode_uri_component(query),
			tag_ids.join(",")
		);
		let response = self
			.modify_request(params, Request::get(url)?)?
			.send()?
			.get_json::<QueryResponse>()?;

		let entries = response
			.data
			.into_iter()
			.map(|item| Manga {
				url: Some(format!("{}/series/{}", params.base_url, item.series_slug)),
				cover: Some(image_url(&params.cdn_url, &item.thumbnail)),
				key: item.series_slug,
				title: item.title,
				..Default::default()
			})
			.collect::<Vec<_>>();
		let has_next_page = page < response.meta.last_page;

		Ok(MangaPageResult {
			entries,
			has_next_page,
		})
	}

	fn get_manga_update(
		&self,
		params: &Params,
		mut manga: Manga,
		needs_details: bool,
		needs_chapters: bool,
	) -> Result<Manga> {
		let url = format!("{}/series/{}", params.api_url, manga.key);
		let series = self
			.modify_request(params, Request::get(url)?)?
			.send()?
			.get_json::<SeriesResponse>()?;
		let series_id = series.id;

		if needs_details {
			manga.title = series.title;
			manga.cover = Some(image_url(&params.cdn_url, &series.thumbnail));
			manga.authors = series.author.map(|author| vec![author]);
			manga.artists = series.studio.map(|studio| vec![studio]);
			manga.description = if series.description.is_empty() {
				None
			} else {
				Some(series.description)
			};
			manga.url = Some(format!("{}/series/{}", params.base_url, manga.key));
			manga.tags = Some(series.tags.into_iter().map(|tag| tag.name).collect());
			manga.status = match series.status.as_str() {
				"Ongoing" | "New" => MangaStatus::Ongoing,
				"Completed" => MangaStatus::Completed,
				"Hiatus" => MangaStatus::Hiatus,
				"Dropped" | "Cancelled" => MangaStatus::Cancelled,
				_ => MangaStatus::Unknown,
			};
			manga.content_rating = self.content_rating(params);
			manga.viewer = Viewer::Webtoon;

			if needs_chapters {
				send_partial_result(&manga);
			}
		}

		if needs_chapters {
			manga.chapters = Some(self.get_chapter_list(params, &manga.key, series_id)?);
		}

		Ok(manga)
	}

	fn get_chapter_list(
		&self,
		params: &Params,
		series_slug: &str,
		series_id: i32,
	) -> Result<Vec<Chapter>> {
		let show_paid = defaults_get::<bool>("show_paid_chapters").unwrap_or(false);
		let mut chapters: Vec<Chapter> = Vec::new();
		let mut page = 1;

		// the api caps perPage, so walk meta.last_page
		loop {
			let url = format!(
				"{}/chapter/query?page={page}&perPage=30&series_id={series_id}",
				params.api_url
			);
			let response = self
				.modify_request(params, Request::get(url)?)?
				.send()?
				.get_json::<ChapterResponse>()?;
			let last_page = response.meta.last_page;

			for item in response.data {
				let paid = item.price != 0;
				if paid && !show_paid {
					continue;
				}
				let title = item
					.chapter_title
					.or(item.chapter_name)
					.map(|title| title.trim().to_string())
					.filter(|title| !title.is_empty());
				let chapter_number = title
					.as_deref()
					.and_then(first_number)
					.or_else(|| first_number(&item.chapter_slug));
				chapters.push(Chapter {
					url: Some(format!(
						"{}/series/{series_slug}/{}",
						params.base_url, item.chapter_slug
					)),
					key: item.chapter_slug,
					title,
					chapter_number,
					date_uploaded: parse_rfc3339_date(&item.created_at),
					locked: paid,
					..Default::default()
				});
			}

			if page >= last_page {
				break;
			}
			page += 1;
		}

		Ok(chapters)
	}

	fn get_page_list(&self, params: &Params, manga: Manga, chapter: Chapter) -> Result<Vec<Page>> {
		let url = format!("{}/chapter/{}/{}", params.api_url, manga.key, chapter.key);
		let response = self
			.modify_request(params, Request::get(url)?)?
			.send()?
			.get_json::<PageListResponse>()?;

		let images = response.into_images();
		if images.is_empty() {
			bail!("This chapter is paid; purchase it on the website to read it");
		}

		Ok(images
			.into_iter()
			.map(|image| Page {
				content: PageContent::url(image_url(&params.cdn_url, &image)),
				..Default::default()
			})
			.collect())
	}

	fn content_rating(&self, _params: &Params) -> ContentRating {
		ContentRating::Safe
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
		let Some(path) = path.strip_prefix("/series/") else {
			return Ok(None);
		};

		let path = path.trim_end_matches('/');
		Ok(Some(match path.split_once('/') {
			// ex: {base}/series/some-title/chapter-12
			Some((manga_key, chapter_key)) => DeepLinkResult::Chapter {
				manga_key: manga_key.into(),
				key: chapter_key.into(),
			},
			None => DeepLinkResult::Manga { key: path.into() },
		}))
	}

	fn modify_request(&self, _params: &Params, request: Request) -> Result<Request> {
		Ok(request)
	}
}

// joins a cdn-relative image path, passing absolute urls through
pub fn image_url(cdn_url: &str, image: &str) -> String {
	if image.starts_with("http") {
		image.into()
	} else {
		format!("{}/{}", cdn_url.trim_end_matches('/'), image.trim_start_matches('/'))
	}
}

pub fn parse_rfc3339_date(date: &str) -> Option<i64> {
	chrono::DateTime::parse_from_rfc3339(date)
		.map(|date| date.timestamp())
		.ok()
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

#[cfg(test)]
mod test {
	use super::*;
	use aidoku_test::aidoku_test;

	#[aidoku_test]
	fn rfc3339_dates() {
		assert_eq!(
			parse_rfc3339_date("2024-03-02T00:00:00.000Z"),
			Some(1709337600)
		);
		assert_eq!(
			parse_rfc3339_date("2024-03-01T00:00:00+00:00"),
			Some(1709251200)
		);
		assert_eq!(parse_rfc3339_date("yesterday"), None);
	}

	#[aidoku_test]
	fn cdn_image_urls() {
		assert_eq!(
			image_url("https://cdn.example.org", "chapters/1/01.webp"),
			"https://cdn.example.org/chapters/1/01.webp"
		);
		assert_eq!(
			image_url("https://cdn.example.org/", "/chapters/1/01.webp"),
			"https://cdn.example.org/chapters/1/01.webp"
		);
		assert_eq!(
			image_url("https://cdn.example.org", "https://other.example.org/01.webp"),
			"https://other.example.org/01.webp"
		);
	}

	#[aidoku_test]
	fn chapter_numbers_from_slugs() {
		assert_eq!(first_number("chapter-10"), Some(10.0));
		assert_eq!(first_number("Chapter 5.5"), Some(5.5));
		assert_eq!(first_number("prologue"), None);
	}
}
