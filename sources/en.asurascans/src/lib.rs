#![no_std]
use aidoku::{
	prelude::*, DeepLinkHandler, ImageRequestProvider, ListingProvider, Source, Viewer,
};
use mangathemesia::{Impl, MangaThemesia, Params};

const BASE_URL: &str = "https://asurascans.com";

struct AsuraScans;

impl Impl for AsuraScans {
	fn new() -> Self {
		Self
	}

	fn params(&self) -> Params {
		Params {
			base_url: BASE_URL.into(),
			directory_path: "/series".into(),
			default_viewer: Viewer::Webtoon,
			..Default::default()
		}
	}
}

register_source!(
	MangaThemesia<AsuraScans>,
	ListingProvider,
	ImageRequestProvider,
	DeepLinkHandler
);
