use std::sync::LazyLock;

use scraper::{Html, Selector};
use url::Url;

use crate::domain::{ItemLinkRecord, PageExtract};

use super::html_text::{element_text, parse_selector, NON_CONTENT_TAGS};

// Search result cards and bestseller ranking cards.
static CARD: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector(
        r#"div[data-component-type="s-search-result"], div.s-featured-result-item, div.p13n-sc-uncoverable-faceout"#,
    )
});
static CARD_NAME: LazyLock<Selector> =
    LazyLock::new(|| parse_selector(r#"h2, div[class*="p13n-sc-css-line-clamp"]"#));
// Tried in order: the image link of a search card, then any product link.
static CARD_ANCHORS: LazyLock<[Selector; 2]> = LazyLock::new(|| {
    [
        parse_selector("a.a-link-normal.s-no-outline[href]"),
        parse_selector("a.a-link-normal[href]"),
    ]
});
static NEXT_PAGE: LazyLock<Selector> =
    LazyLock::new(|| parse_selector("a.s-pagination-next[href], li.a-last a[href]"));

/// Item links on a listing page plus the link to the next listing page.
///
/// A card without a usable anchor is skipped. The name is kept when the card
/// has one.
pub fn extract_item_links(document: &Html, page_url: &Url) -> PageExtract<ItemLinkRecord> {
    let mut records = vec![];
    let mut dropped = 0;

    for card in document.select(&CARD) {
        let link = CARD_ANCHORS
            .iter()
            .find_map(|anchor| card.select(anchor).next())
            .and_then(|anchor| anchor.value().attr("href"))
            .and_then(|href| page_url.join(href).ok());

        let Some(link) = link else {
            dropped += 1;
            continue;
        };

        let name = card
            .select(&CARD_NAME)
            .next()
            .map(|element| element_text(element, NON_CONTENT_TAGS))
            .filter(|name| !name.is_empty());

        records.push(ItemLinkRecord { name, link });
    }

    let next = document
        .select(&NEXT_PAGE)
        .next()
        .and_then(|anchor| anchor.value().attr("href"))
        .and_then(|href| page_url.join(href).ok());

    PageExtract {
        records,
        next,
        dropped,
    }
}
