#![no_std]
use aidoku::{
	alloc::{borrow::Cow, String, Vec},
	imports::net::Request,
	prelude::*,
	Chapter, DeepLinkHandler, DeepLinkResult, DynamicFilters, Filter, FilterValue, Home, HomeLayout,
	ImageRequestProvider, Listing, ListingProvider, Manga, MangaPageResult, Page, PageContext,
	Result, Source, Viewer,
};

mod crypto;
pub mod helper;
mod imp;
mod models;

pub use imp::Impl;

pub struct Params {
	pub base_url: Cow<'static, str>,
	// path segment entries live under (e.g. "manga" in /manga/some-title/)
	pub source_path: Cow<'static, str>,
	// use POST {entry}/ajax/chapters instead of the legacy admin-ajax.php action
	pub use_new_chapter_endpoint: bool,
	// search results are fetched with "madara_load_more" form posts instead of /page/N/
	pub use_load_more_search: bool,
	// cover urls are stored in a style attribute as a background-image
	pub use_style_images: bool,
	pub default_viewer: Viewer,
	// chrono format for absolute chapter dates; relative dates are handled separately
	pub date_format: Cow<'static, str>,
	pub search_item_selector: Cow<'static, str>,
	pub search_link_selector: Cow<'static, str>,
	pub details_title_selector: Cow<'static, str>,
	pub details_cover_selector: Cow<'static, str>,
	pub details_author_selector: Cow<'static, str>,
	pub details_artist_selector: Cow<'static, str>,
	pub details_description_selector: Cow<'static, str>,
	pub details_tag_selector: Cow<'static, str>,
	pub details_status_selector: Cow<'static, str>,
	pub details_type_selector: Cow<'static, str>,
	pub chapter_selector: Cow<'static, str>,
	pub chapter_date_selector: Cow<'static, str>,
	pub page_selector: Cow<'static, str>,
}

impl Default for Params {
	fn default() -> Self {
		Self {
			base_url: "".into(),
			source_path: "manga".into(),
			use_new_chapter_endpoint: false,
			use_load_more_search: false,
			use_style_images: false,
			default_viewer: Viewer::Unknown,
			date_format: "%B %d, %Y".into(),
			search_item_selector: "div.c-tabs-item__content, .manga__item, .page-item-detail"
				.into(),
			search_link_selector: "div.post-title a, h3.h5 a".into(),
			details_title_selector: "div.post-title h3, div.post-title h1, #manga-title > h1"
				.into(),
			details_cover_selector: "div.summary_image img".into(),
			details_author_selector: "div.author-content > a, div.manga-authors > a".into(),
			details_artist_selector: "div.artist-content > a".into(),
			details_description_selector: "div.description-summary div.summary__content, \
										   div.summary_content div.post-content_item > h5 + div, \
										   div.summary_content div.manga-excerpt"
				.into(),
			details_tag_selector: "div.genres-content a".into(),
			details_status_selector: "div.summary-heading:contains(Status) + div".into(),
			details_type_selector: "div.post-content_item:contains(Type) div.summary-content"
				.into(),
			chapter_selector: "li.wp-manga-chapter".into(),
			chapter_date_selector: "span.chapter-release-date".into(),
			page_selector: "div.page-break, li.blocks-gallery-item, \
							.reading-content .text-left:not(:has(.blocks-gallery-item)) img"
				.into(),
		}
	}
}

pub struct Madara<T: Impl> {
	inner: T,
	params: Params,
}

impl<T: Impl> Source for Madara<T> {
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

impl<T: Impl> ListingProvider for Madara<T> {
	fn get_manga_list(&self, listing: Listing, page: i32) -> Result<MangaPageResult> {
		self.inner.get_manga_list(&self.params, listing, page)
	}
}

impl<T: Impl> Home for Madara<T> {
	fn get_home(&self) -> Result<HomeLayout> {
		self.inner.get_home(&self.params)
	}
}

impl<T: Impl> DynamicFilters for Madara<T> {
	fn get_dynamic_filters(&self) -> Result<Vec<Filter>> {
		self.inner.get_dynamic_filters(&self.params)
	}
}

impl<T: Impl> ImageRequestProvider for Madara<T> {
	fn get_image_request(&self, url: String, context: Option<PageContext>) -> Result<Request> {
		self.inner.get_image_request(&self.params, url, context)
	}
}

impl<T: Impl> DeepLinkHandler for Madara<T> {
	fn handle_deep_link(&self, url: String) -> Result<Option<DeepLinkResult>> {
		self.inner.handle_deep_link(&self.params, url)
	}
}
