#![no_std]
use aidoku::{
	alloc::{borrow::Cow, String},
	imports::{defaults::defaults_get, html::Document, net::Request},
	prelude::*,
	ContentRating, DeepLinkHandler, DynamicFilters, Home, ImageRequestProvider, ListingProvider,
	Manga, Result, Source, Viewer,
};
use madara::{Impl, Madara, Params};

const DEFAULT_BASE_URL: &str = "https://toonily.com";

struct Toonily;

impl Impl for Toonily {
	fn new() -> Self {
		Self
	}

	fn params(&self) -> Params {
		// the site rotates domains, so a saved mirror url takes priority
		let base_url = defaults_get::<String>("url")
			.filter(|url| !url.is_empty())
			.map(Cow::Owned)
			.unwrap_or(DEFAULT_BASE_URL.into());
		Params {
			base_url,
			source_path: "serie".into(),
			use_new_chapter_endpoint: true,
			default_viewer: Viewer::Webtoon,
			..Default::default()
		}
	}

	fn get_manga_content_rating(&self, html: &Document, manga: &Manga) -> ContentRating {
		if html.select_first(".manga-title-badges.adult").is_some() {
			return ContentRating::NSFW;
		}
		let tags = manga.tags.as_deref().unwrap_or(&[]);
		if tags
			.iter()
			.any(|tag| matches!(tag.as_str(), "Adult" | "Mature" | "Smut" | "Hentai"))
		{
			ContentRating::NSFW
		} else {
			// most of the catalog is mature even without a badge
			ContentRating::Suggestive
		}
	}

	fn modify_request(&self, _params: &Params, request: Request) -> Result<Request> {
		// unlocks mature entries in listings and search
		Ok(request.header("Cookie", "toonily-mature=1"))
	}
}

register_source!(
	Madara<Toonily>,
	ListingProvider,
	Home,
	DynamicFilters,
	ImageRequestProvider,
	DeepLinkHandler
);
