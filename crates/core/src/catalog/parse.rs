//! Extraction of catalog records from community HTML pages.
//!
//! Markup is not a stable contract, so every field is extracted as an
//! `Option` and records are assembled afterwards with fixed defaults. A
//! missing field never fails a whole page.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex_lite::Regex;
use scraper::{ElementRef, Html, Selector};

use super::types::CatalogItem;

/// Author used when a detail or search page does not name one.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

static STAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d)-star\.png").expect("star pattern is valid"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

static ITEM_TITLE: Lazy<Selector> = Lazy::new(|| selector(".workshopItemTitle"));
static DETAIL_AUTHOR: Lazy<Selector> = Lazy::new(|| selector(".friendBlockContent"));
static DETAIL_IMAGES: Lazy<[Selector; 3]> = Lazy::new(|| {
    [
        selector("#previewImageMain"),
        selector("#previewImage"),
        selector("img.workshopItemPreviewImage"),
    ]
});
static FILE_RATING: Lazy<Selector> = Lazy::new(|| selector(".fileRating"));
static SEARCH_ITEM: Lazy<Selector> = Lazy::new(|| selector(".workshopItem"));
static SEARCH_IMAGE: Lazy<Selector> = Lazy::new(|| selector(".workshopItemPreviewImage"));
static SEARCH_AUTHOR: Lazy<Selector> = Lazy::new(|| selector(".workshopItemAuthorName a"));
static SEARCH_LINK: Lazy<Selector> = Lazy::new(|| selector("a.workshopItemPreviewHolder"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| selector("a"));

/// Convert a rating image URL (`.../4-star.png`) to stars.
pub fn rating_to_stars(rating_url: &str) -> String {
    STAR_RE
        .captures(rating_url)
        .and_then(|caps| caps.get(1))
        .and_then(|digit| digit.as_str().parse::<usize>().ok())
        .map(|count| "★".repeat(count.min(5)))
        .unwrap_or_default()
}

/// Text content with every text node trimmed, `None` when blank.
fn element_text(element: ElementRef<'_>) -> Option<String> {
    let text = element.text().map(str::trim).collect::<String>();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn attr(element: ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn strip_query(url: String) -> String {
    match url.split_once('?') {
        Some((base, _)) => base.to_string(),
        None => url,
    }
}

/// Build a record from an item detail page.
///
/// Always succeeds: absent fields fall back to `title = id`,
/// `author = "Unknown"` and empty image and rating.
pub fn parse_item_page(id: &str, detail_url: &str, html: &str) -> CatalogItem {
    let document = Html::parse_document(html);

    let title = document.select(&ITEM_TITLE).next().and_then(element_text);
    let author = document.select(&DETAIL_AUTHOR).next().and_then(element_text);
    let image = DETAIL_IMAGES
        .iter()
        .find_map(|sel| document.select(sel).next())
        .and_then(|el| attr(el, "src"))
        .map(strip_query);
    let rating = document
        .select(&FILE_RATING)
        .next()
        .and_then(|el| attr(el, "src"))
        .map(|src| rating_to_stars(&src));

    CatalogItem {
        id: id.to_string(),
        title: title.unwrap_or_else(|| id.to_string()),
        author: author.unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        preview_image_url: image.unwrap_or_default(),
        detail_url: detail_url.to_string(),
        rating_stars: rating.unwrap_or_default(),
        rating_img: None,
    }
}

fn parse_search_entry(element: ElementRef<'_>) -> Option<CatalogItem> {
    let id = attr(element, "data-publishedfileid").or_else(|| {
        element
            .select(&ANCHOR)
            .next()
            .and_then(|a| attr(a, "data-publishedfileid"))
    });
    let title = element.select(&ITEM_TITLE).next().and_then(element_text);
    let image = element.select(&SEARCH_IMAGE).next();
    let author = element.select(&SEARCH_AUTHOR).next().and_then(element_text);
    let link = element
        .select(&SEARCH_LINK)
        .next()
        .and_then(|a| attr(a, "href"));
    let rating_img = element
        .select(&FILE_RATING)
        .next()
        .and_then(|el| attr(el, "src"));

    // id, title and image element are required
    let (id, title, image) = (id?, title?, image?);

    Some(CatalogItem {
        id,
        title,
        author: author.unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        preview_image_url: attr(image, "src").unwrap_or_default(),
        detail_url: link.unwrap_or_default(),
        rating_stars: rating_img.as_deref().map(rating_to_stars).unwrap_or_default(),
        rating_img,
    })
}

/// Extract every complete item from a browse/search page.
///
/// Entries missing an id, title or preview image are dropped. Repeated ids
/// keep their first occurrence.
pub fn parse_search_page(html: &str) -> Vec<CatalogItem> {
    let document = Html::parse_document(html);
    let items = document
        .select(&SEARCH_ITEM)
        .filter_map(parse_search_entry)
        .collect();
    dedup_by_id(items)
}

/// Remove items whose id was already seen, preserving order.
pub fn dedup_by_id(items: Vec<CatalogItem>) -> Vec<CatalogItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.id.clone()))
        .collect()
}
