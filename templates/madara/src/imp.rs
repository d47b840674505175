use super::Params;
use crate::{
	crypto,
	helper::{self, ElementImageAttr},
	models::ProtectorData,
};
use aidoku::{
	alloc::{vec, String, Vec},
	imports::{
		error::AidokuError,
		html::{Document, Element},
		net::Request,
		std::{current_date, send_partial_result},
	},
	prelude::*,
	Chapter, ContentRating, DeepLinkResult, Filter, FilterValue, HomeComponent, HomeComponentValue,
	HomeLayout, Listing, Manga, MangaPageResult, MangaStatus, MangaWithChapter, MultiSelectFilter,
	Page, PageContent, PageContext, Result, Viewer,
};
use base64::prelude::*;

pub trait Impl {
	fn new() -> Self;

	fn params(&self) -> Params;

	fn get_manga_list(
		&self,
		params: &Params,
		listing: Listing,
		page: i32,
	) -> Result<MangaPageResult> {
		let sort_index = match listing.id.as_str() {
			"popular" => 5,
			"latest" => 1,
			_ => bail!("Invalid listing"),
		};
		self.get_search_manga_list(
			params,
			None,
			page,
			vec![FilterValue::Sort {
				id: "m_orderby".into(),
				index: sort_index,
				ascending: false,
			}],
		)
	}

	fn get_search_manga_list(
		&self,
		params: &Params,
		query: Option<String>,
		page: i32,
		filters: Vec<FilterValue>,
	) -> Result<MangaPageResult> {
		let request = if params.use_load_more_search {
			helper::get_load_more_request(params, query, page, filters)?
		} else {
			helper::get_search_request(params, query, page, filters)?
		};
		let html = self.modify_request(params, request)?.html()?;

		let entries = html
			.select(&params.search_item_selector)
			.map(|els| {
				els.filter_map(|el| self.parse_manga_element(params, el))
					.collect::<Vec<_>>()
			})
			.unwrap_or_default();

		let has_next_page = if params.use_load_more_search {
			!entries.is_empty()
		} else {
			html.select_first("div.nav-previous, nav.navigation-ajax, a.nextpostslink")
				.is_some()
		};

		Ok(MangaPageResult {
			entries,
			has_next_page,
		})
	}

	fn parse_manga_element(&self, params: &Params, element: Element) -> Option<Manga> {
		let link = element.select_first(&params.search_link_selector)?;
		let url = link.attr("abs:href")?;
		let key = url
			.strip_prefix(params.base_url.as_ref())
			.map(String::from)
			.unwrap_or(url);
		let title = link.text()?;
		let cover = element
			.select_first("img")
			.and_then(|img| img.img_attr(params.use_style_images));
		Some(Manga {
			key,
			title,
			cover,
			..Default::default()
		})
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
				.and_then(|el| el.own_text())
				.unwrap_or(manga.title);
			manga.cover = html
				.select_first(&params.details_cover_selector)
				.and_then(|img| img.img_attr(params.use_style_images))
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
				.select(&params.details_tag_selector)
				.map(|els| els.filter_map(|el| el.text()).collect());
			manga.url = Some(url.clone());
			manga.status = html
				.select_first(&params.details_status_selector)
				.and_then(|el| el.text())
				.map(|text| self.get_manga_status(&text))
				.unwrap_or_default();
			manga.content_rating = self.get_manga_content_rating(&html, &manga);
			manga.viewer = html
				.select_first(&params.details_type_selector)
				.and_then(|el| el.text())
				.map(|text| self.get_manga_viewer(&text, params.default_viewer))
				.unwrap_or(params.default_viewer);

			if needs_chapters {
				send_partial_result(&manga);
			}
		}

		if needs_chapters {
			let mut chapter_elements = html.select(&params.chapter_selector);
			let has_chapters = chapter_elements
				.as_ref()
				.map(|els| !els.is_empty())
				.unwrap_or(false);
			// chapter lists are usually loaded with a second ajax request
			if !has_chapters {
				let request = if params.use_new_chapter_endpoint {
					Request::post(helper::ajax_chapters_url(&url))?
				} else {
					let manga_id = html
						.select_first("div[id^=manga-chapters-holder]")
						.and_then(|el| el.attr("data-id"))
						.ok_or(AidokuError::message("Missing manga id"))?;
					Request::post(format!("{}/wp-admin/admin-ajax.php", params.base_url))?
						.body(format!("action=manga_get_chapters&manga={manga_id}"))
						.header("Content-Type", "application/x-www-form-urlencoded")
				};
				let request = request
					.header("Referer", &format!("{}/", params.base_url))
					.header("X-Requested-With", "XMLHttpRequest");
				let ajax_html = self.modify_request(params, request)?.html()?;
				chapter_elements = ajax_html.select(&params.chapter_selector);
			}
			// rows are listed newest first; keep that order
			manga.chapters = chapter_elements.map(|els| {
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
		let title = link.own_text();
		let chapter_number = title.as_deref().and_then(helper::first_number);
		let date_uploaded = element
			.select_first(&params.chapter_date_selector)
			.and_then(|el| el.text())
			.map(|date| helper::parse_chapter_date(&params.date_format, &date, current_date()));
		Some(Chapter {
			key,
			title,
			chapter_number,
			date_uploaded,
			url: Some(url),
			..Default::default()
		})
	}

	fn get_manga_status(&self, status: &str) -> MangaStatus {
		match status.trim() {
			"OnGoing" | "Ongoing" | "Updating" | "En cours" | "En Cours" | "En curso"
			| "Emision" | "Berjalan" => MangaStatus::Ongoing,
			"Completed" | "Complete" | "Terminé" | "Completado" | "Finalizado" | "Tamat" => {
				MangaStatus::Completed
			}
			"On Hold" | "OnHold" | "En pause" | "En Pause" | "Pausado" => MangaStatus::Hiatus,
			"Canceled" | "Cancelled" | "Dropped" | "Annulé" | "Cancelado" => MangaStatus::Cancelled,
			_ => MangaStatus::Unknown,
		}
	}

	fn get_manga_viewer(&self, kind: &str, default: Viewer) -> Viewer {
		match kind.trim().to_lowercase().as_str() {
			"manga" => Viewer::RightToLeft,
			"manhwa" | "manhua" | "webtoon" | "webtoons" => Viewer::Webtoon,
			"comic" | "bande dessinée" => Viewer::LeftToRight,
			_ => default,
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
		} else if tags.iter().any(|tag| tag == "Ecchi") {
			ContentRating::Suggestive
		} else {
			ContentRating::Safe
		}
	}

	fn get_page_list(&self, params: &Params, _manga: Manga, chapter: Chapter) -> Result<Vec<Page>> {
		let url = format!("{}{}", params.base_url, chapter.key);
		let html = self.modify_request(params, Request::get(&url)?)?.html()?;

		if let Some(protector) = html.select_first("#chapter-protector-data") {
			return self.decrypt_protected_pages(protector);
		}

		let pages = html
			.select(&params.page_selector)
			.map(|els| {
				els.filter_map(|el| {
					let image = el
						.img_attr(params.use_style_images)
						.or_else(|| el.select_first("img")?.img_attr(params.use_style_images))?;
					Some(Page {
						content: PageContent::url(image.trim()),
						..Default::default()
					})
				})
				.collect::<Vec<_>>()
			})
			.unwrap_or_default();

		if pages.is_empty() && html.select_first(".reading-content").is_none() {
			bail!("Unable to load chapter; open it in a browser to authenticate");
		}

		Ok(pages)
	}

	fn decrypt_protected_pages(&self, protector: Element) -> Result<Vec<Page>> {
		// the protector script is either inlined or base64-encoded in a data uri
		let script = protector
			.attr("src")
			.and_then(|src| {
				src.strip_prefix("data:text/javascript;base64,")
					.and_then(|data| BASE64_STANDARD.decode(data).ok())
			})
			.and_then(|bytes| String::from_utf8(bytes).ok())
			.or_else(|| protector.html())
			.unwrap_or_default();

		let password = helper::extract_between(&script, "wpmangaprotectornonce='", "';")
			.ok_or(AidokuError::message("Missing protector password"))?;
		let data = helper::extract_between(&script, "chapter_data='", "';")
			.map(|s| s.replace("\\/", "/"))
			.and_then(|s| serde_json::from_str::<ProtectorData>(&s).ok())
			.ok_or(AidokuError::message("Missing protector data"))?;

		let salt = helper::decode_hex(&data.s).ok_or(AidokuError::message("Invalid salt"))?;
		let ciphertext = BASE64_STANDARD
			.decode(data.ct)
			.map_err(|_| AidokuError::message("Invalid ciphertext"))?;
		let mut payload = Vec::with_capacity(8 + salt.len() + ciphertext.len());
		payload.extend_from_slice(b"Salted__");
		payload.extend(salt);
		payload.extend(ciphertext);

		let decrypted = crypto::decrypt_openssl_aes(&payload, password.as_bytes())
			.ok_or(AidokuError::message("Failed to decrypt chapter data"))?;
		// the result is a json string which itself contains a json string array
		let urls = serde_json::from_slice::<String>(&decrypted)
			.and_then(|inner| serde_json::from_str::<Vec<String>>(&inner))
			.map_err(|_| AidokuError::message("Failed to parse chapter data"))?;

		Ok(urls
			.into_iter()
			.map(|url| Page {
				content: PageContent::url(url),
				..Default::default()
			})
			.collect())
	}

	fn get_home(&self, params: &Params) -> Result<HomeLayout> {
		let html = self
			.modify_request(params, Request::get(&params.base_url)?)?
			.html()?;

		let parse_manga = |el: &Element| -> Option<Manga> {
			let link = el.select_first(".post-title a, .widget-title a")?;
			let url = link.attr("abs:href")?;
			Some(Manga {
				key: url
					.strip_prefix(params.base_url.as_ref())
					.map(String::from)
					.unwrap_or_else(|| url.clone()),
				title: link.text()?,
				cover: el
					.select_first("img")
					.and_then(|img| img.img_attr(params.use_style_images)),
				url: Some(url),
				..Default::default()
			})
		};

		let mut components = Vec::new();

		if let Some(items) = html.select(".widget-manga-popular-slider .slider__item") {
			let entries = items
				.filter_map(|el| parse_manga(&el).map(Into::into))
				.collect::<Vec<_>>();
			if !entries.is_empty() {
				components.push(HomeComponent {
					title: Some("Popular".into()),
					value: HomeComponentValue::Scroller {
						entries,
						listing: Some(Listing {
							id: "popular".into(),
							name: "Popular".into(),
							..Default::default()
						}),
					},
					..Default::default()
				});
			}
		}

		if let Some(items) = html.select(".page-listing-item .manga") {
			let entries = items
				.filter_map(|el| {
					let manga = parse_manga(&el)?;
					let chapter_link = el.select_first(".chapter-item a")?;
					let chapter_url = chapter_link.attr("abs:href")?;
					let title = chapter_link.text();
					Some(MangaWithChapter {
						manga,
						chapter: Chapter {
							key: chapter_url
								.strip_prefix(params.base_url.as_ref())
								.map(String::from)
								.unwrap_or_else(|| chapter_url.clone()),
							chapter_number: title.as_deref().and_then(helper::first_number),
							title,
							url: Some(chapter_url),
							..Default::default()
						},
					})
				})
				.collect::<Vec<_>>();
			if !entries.is_empty() {
				components.push(HomeComponent {
					title: Some("Latest Updates".into()),
					value: HomeComponentValue::MangaChapterList {
						page_size: None,
						entries,
						listing: Some(Listing {
							id: "latest".into(),
							name: "Latest".into(),
							..Default::default()
						}),
					},
					..Default::default()
				});
			}
		}

		Ok(HomeLayout { components })
	}

	fn get_dynamic_filters(&self, params: &Params) -> Result<Vec<Filter>> {
		let url = format!("{}/?s=genre&post_type=wp-manga", params.base_url);
		let html = self.modify_request(params, Request::get(url)?)?.html()?;

		let (options, ids) = html
			.select("div.checkbox-group div.checkbox")
			.ok_or(AidokuError::message("Missing genre checkboxes"))?
			.filter_map(|el| {
				let name = el.select_first("label")?.text()?;
				let slug = el.select_first("input[type=checkbox]")?.attr("value")?;
				Some((name.into(), slug.into()))
			})
			.unzip();

		Ok(vec![MultiSelectFilter {
			id: "genre[]".into(),
			title: Some("Genres".into()),
			is_genre: true,
			can_exclude: false,
			options,
			ids: Some(ids),
			..Default::default()
		}
		.into()])
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

		let prefix = format!("/{}/", params.source_path);
		if !path.starts_with(&prefix) {
			return Ok(None);
		}

		if let Some(idx) = path.rfind("/chapter") {
			// ex: {base}/manga/some-title/chapter-12/
			Ok(Some(DeepLinkResult::Chapter {
				manga_key: format!("{}/", &path[..idx]),
				key: path.into(),
			}))
		} else {
			// ex: {base}/manga/some-title/
			Ok(Some(DeepLinkResult::Manga { key: path.into() }))
		}
	}

	fn modify_request(&self, _params: &Params, request: Request) -> Result<Request> {
		Ok(request)
	}
}
