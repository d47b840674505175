#![no_std]
use aidoku::{prelude::*, DeepLinkHandler, ImageRequestProvider, ListingProvider, Source};
use heancms::{HeanCms, Impl, Params};

struct TempleScan;

impl Impl for TempleScan {
	fn new() -> Self {
		Self
	}

	fn params(&self) -> Params {
		Params {
			base_url: "https://templescan.net".into(),
			api_url: "https://api.templescan.net".into(),
			cdn_url: "https://media.templescan.net".into(),
		}
	}
}

register_source!(
	HeanCms<TempleScan>,
	ListingProvider,
	ImageRequestProvider,
	DeepLinkHandler
);
