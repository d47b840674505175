#![no_std]
use aidoku::{
	alloc::{borrow::Cow, String, Vec},
	imports::net::Request,
	Chapter, DeepLinkHandler, DeepLinkResult, FilterValue, ImageRequestProvider, Listing,
	ListingProvider, Manga, MangaPageResult, Page, PageContext, Result, Source, Viewer,
};

mod imp;
mod models;

pub use imp::{first_number, parse_date, Impl};
pub use models::{ReaderSettings, ReaderSource};

pub struct Params {
	pub base_url: Cow<'static, str>,
	// directory the series listing lives under (e.g. "/manga" or "/series")
	pub directory_path: Cow<'static, str>,
	pub default_viewer: Viewer,
	// chrono format for chapter dates
	pub date_format: Cow<'static, str>,
	pub item_selector: Cow<'static, str>,
	pub details_title_selector: Cow<'static, str>,
	pub details_cover_selector: Cow<'static, str>,
	pub details_author_selector: Cow<'static, str>,
	pub details_artist_selector: Cow<'static, str>,
	pub details_description_selector: Cow<'static, str>,
	pub details_genre_selector: Cow<'static, str>,
	pub details_status_selector: Cow<'static, str>,
	pub details_type_selector: Cow<'static, str>,
	pub chapter_selector: Cow<'static, str>,
	pub page_selector: Cow<'static, str>,
}

impl Default for Params {
	fn default() -> Self {
		Self {
			base_url: "".into(),
			directory_path: "/manga".into(),
			default_viewer: Viewer::RightToLeft,
			date_format: "%B %d, %Y".into(),
			item_selector: ".utao .uta .imgu, .listupd .bs .bsx".into(),
			details_title_selector: "h1.entry-title".into(),
			details_cover_selector: ".infomanga > div[itemprop=image] img, .thumb img".into(),
			details_author_selector:
				".infotable tr:contains(Author) td:last-child, .tsinfo .imptdt:contains(Author) i, \
				 .fmed b:contains(Author) + span"
					.into(),
			details_artist_selector:
				".infotable tr:contains(Artist) td:last-child, .tsinfo .imptdt:contains(Artist) i, \
				 .fmed b:contains(Artist) + span"
					.into(),
			details_description_selector: ".desc, .entry-content[itemprop=description]".into(),
			details_genre_selector: "div.gnr a, .mgen a, .seriestugenre a".into(),
			details_status_selector:
				".infotable tr:contains(Status) td:last-child, .tsinfo .imptdt:contains(Status) i"
					.into(),
			details_type_selector:
				".infotable tr:contains(Type) td:last-child, .tsinfo .imptdt:contains(Type) a"
					.into(),
			chapter_selector: "#chapterlist li".into(),
			page_selector: "#readerarea img".into(),
		}
	}
}

pub struct MangaThemesia<T: Impl> {
	inner: T,
	params: Params,
}

impl<T: Impl> Source for MangaThemesia<T> {
	fn new() -> Self {
		let inner = T::new();
		let params = inner.params();
		Self { inner, params }
	}

	fn get_search_manga_list(
		&self,
		query: Option<String>,
		page: i32,
		filters: Vec<FilterValue>,
	) -> Result<MangaPageResult> {
		self.inner
			.get_search_manga_list(&self.params, query, page, filters)
	}

	fn get_manga_update(
		&self,
		manga: Manga,
		needs_details: bool,
		needs_chapters: bool,
	) -> Result<Manga> {
		self.inner
			.get_manga_update(&self.params, manga, needs_details, needs_chapters)
	}

	fn get_page_list(&self, manga: Manga, chapter: Chapter) -> Result<Vec<Page>> {
		self.inner.get_page_list(&self.params, manga, chapter)
	}
}

impl<T: Impl> ListingProvider for MangaThemesia<T> {
	fn get_manga_list(&self, listing: Listing, page: i32) -> Result<MangaPageResult> {
		self.inner.get_manga_list(&self.params, listing, page)
	}
}

impl<T: Impl> ImageRequestProvider for MangaThemesia<T> {
	fn get_image_request(&self, url: String, context: Option<PageContext>) -> Result<Request> {
		self.inner.get_image_request(&self.params, url, context)
	}
}

impl<T: Impl> DeepLinkHandler for MangaThemesia<T> {
	fn handle_deep_link(&self, url: String) -> Result<Option<DeepLinkResult>> {
		self.inner.handle_deep_link(&self.params, url)
	}
}
