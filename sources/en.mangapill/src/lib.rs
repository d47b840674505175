#![no_std]
use aidoku::{
	alloc::{String, Vec},
	imports::{net::Request, std::send_partial_result},
	prelude::*,
	AidokuError, Chapter, ContentRating, DeepLinkHandler, DeepLinkResult, FilterValue,
	ImageRequestProvider, Listing, ListingProvider, Manga, MangaPageResult, MangaStatus, Page,
	PageContent, Result, Source, Viewer,
};

mod helper;

const BASE_URL: &str = "https://mangapill.com";
const REFERER: &str = "https://mangapill.com/";

struct MangaPill;

impl Source for MangaPill {
	fn new() -> Self {
		Self
	}

	fn get_search_manga_list(
		&self,
		query: Option<String>,
		page: i32,
		filters: Vec<FilterValue>,
	) -> Result<MangaPageResult> {
		let url = helper::search_url(BASE_URL, query, filters, page);
		let html = Request::get(&url)?.html()?;

		let entries = html
			.select("div.my-3.grid > div")
			.map(|elements| {
				elements
					.filter_map(|element| {
						let link = element.select_first("a[href^=/manga]")?;
						let key = link.attr("href")?;
						let title = element
							.select_first("div.leading-tight")
							.and_then(|el| el.text())?;
						let cover = element
							.select_first("img")
							.and_then(|img| img.attr("abs:data-src").or_else(|| img.attr("abs:src")));
						Some(Manga {
							key,
							title,
							cover,
							..Default::default()
						})
					})
					.collect::<Vec<Manga>>()
			})
			.unwrap_or_default();

		let has_next_page = !entries.is_empty();

		Ok(MangaPageResult {
			entries,
			has_next_page,
		})
	}

	fn get_manga_update(
		&self,
		mut manga: Manga,
		needs_details: bool,
		needs_chapters: bool,
	) -> Result<Manga> {
		let manga_url = format!("{BASE_URL}{}", manga.key);
		let html = Request::get(&manga_url)?.html()?;

		if needs_details {
			manga.title = html
				.select_first("h1")
				.and_then(|el| el.text())
				.unwrap_or(manga.title);
			manga.cover = html
				.select_first("div.text-transparent img")
				.and_then(|el| el.attr("abs:data-src").or_else(|| el.attr("abs:src")));
			manga.description = html.select_first("p.text-sm").and_then(|el| el.text());
			manga.url = Some(manga_url.clone());
			manga.tags = html
				.select("a[href*=genre]")
				.map(|els| els.filter_map(|el| el.text()).collect::<Vec<String>>());

			let field = |label: &str| {
				html.select_first(&format!("label:contains({label}) + div"))
					.and_then(|el| el.text())
					.unwrap_or_default()
			};

			manga.status = match field("Status").as_str() {
				"publishing" => MangaStatus::Ongoing,
				"finished" => MangaStatus::Completed,
				"on hiatus" => MangaStatus::Hiatus,
				"discontinued" => MangaStatus::Cancelled,
				_ => MangaStatus::Unknown,
			};
			manga.viewer = match field("Type").as_str() {
				"manhwa" | "manhua" => Viewer::Webtoon,
				_ => Viewer::RightToLeft,
			};

			let tags = manga.tags.as_deref().unwrap_or(&[]);
			manga.content_rating = if tags
				.iter()
				.any(|tag| matches!(tag.as_str(), "Hentai" | "Mature"))
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
			// the site publishes no chapter dates
			manga.chapters = html.select("div[data-filter-list] a").map(|elements| {
				elements
					.filter_map(|element| {
						let key = element.attr("href")?;
						let title = element.text()?;
						let chapter_number = helper::chapter_number(&title);
						Some(Chapter {
							url: Some(format!("{BASE_URL}{key}")),
							key,
							title: Some(title),
							chapter_number,
							..Default::default()
						})
					})
					.collect::<Vec<_>>()
			});
		}

		Ok(manga)
	}

	fn get_page_list(&self, _manga: Manga, chapter: Chapter) -> Result<Vec<Page>> {
		let url = format!("{BASE_URL}{}", chapter.key);
		let html = Request::get(url)?.html()?;

		let pages = html
			.select("picture img")
			.map(|els| {
				els.filter_map(|el| {
					let page_url = el.attr("abs:data-src").or_else(|| el.attr("abs:src"))?;
					Some(Page {
						content: PageContent::url(page_url),
						..Default::default()
					})
				})
				.collect::<Vec<_>>()
			})
			.unwrap_or_default();

		Ok(pages)
	}
}

impl ListingProvider for MangaPill {
	fn get_manga_list(&self, listing: Listing, page: i32) -> Result<MangaPageResult> {
		if listing.id == "popular" {
			// the search index in its default order is the closest thing to a popular list
			self.get_search_manga_list(None, page, Vec::new())
		} else {
			bail!("Invalid listing");
		}
	}
}

impl ImageRequestProvider for MangaPill {
	fn get_image_request(
		&self,
		url: String,
		_context: Option<aidoku::PageContext>,
	) -> Result<Request> {
		Ok(Request::get(url)?.header("Referer", REFERER))
	}
}

impl DeepLinkHandler for MangaPill {
	fn handle_deep_link(&self, url: String) -> Result<Option<DeepLinkResult>> {
		if !url.starts_with(BASE_URL) {
			return Ok(None);
		}

		let key = &url[BASE_URL.len()..];

		const MANGA_PATH: &str = "/manga/";
		const CHAPTER_PATH: &str = "/chapters/";

		if key.starts_with(MANGA_PATH) {
			// ex: https://mangapill.com/manga/2/one-piece
			Ok(Some(DeepLinkResult::Manga { key: key.into() }))
		} else if key.starts_with(CHAPTER_PATH) {
			// ex: https://mangapill.com/chapters/2-11063000/one-piece-chapter-1106
			let html = Request::get(&url)?.html()?;
			let manga_key = html
				.select_first("a[href^=/manga]")
				.and_then(|el| el.attr("href"))
				.ok_or(AidokuError::message("Missing manga key"))?;

			Ok(Some(DeepLinkResult::Chapter {
				manga_key,
				key: key.into(),
			}))
		} else {
			Ok(None)
		}
	}
}

register_source!(
	MangaPill,
	ListingProvider,
	ImageRequestProvider,
	DeepLinkHandler
);
