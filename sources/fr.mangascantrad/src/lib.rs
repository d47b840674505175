#![no_std]
use aidoku::{
	prelude::*, DeepLinkHandler, DynamicFilters, Home, ImageRequestProvider, ListingProvider,
	Source,
};
use madara::{Impl, Madara, Params};

const BASE_URL: &str = "https://manga-scantrad.io";

struct MangaScantrad;

impl Impl for MangaScantrad {
	fn new() -> Self {
		Self
	}

	fn params(&self) -> Params {
		Params {
			base_url: BASE_URL.into(),
			use_new_chapter_endpoint: true,
			// absolute dates are french numeric, relative ones are handled by the template
			date_format: "%d/%m/%Y".into(),
			..Default::default()
		}
	}
}

register_source!(
	Madara<MangaScantrad>,
	ListingProvider,
	Home,
	DynamicFilters,
	ImageRequestProvider,
	DeepLinkHandler
);
