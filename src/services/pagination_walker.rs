use std::collections::HashSet;

use scraper::Html;
use url::Url;

use crate::{
    domain::PageExtract,
    error::{PartialWalk, RenderFault},
};

use super::{settle, Renderer, ScrollSettings};

/// Navigates to `url`, scrolls until lazy content stops loading and returns
/// the rendered markup.
pub async fn render_page<R: Renderer + ?Sized>(
    renderer: &mut R,
    scroll: &ScrollSettings,
    url: &Url,
) -> Result<String, RenderFault> {
    renderer.navigate(url.as_str()).await?;
    settle(renderer, scroll).await?;
    renderer.current_document().await
}

/// Follows the chain of "next" cursors from `start_url`, accumulating what
/// `extract_page` finds on every page.
///
/// Stops when a page has no cursor or once `max_records` is reached; the page
/// that crosses the cap is cut to exactly `max_records` and nothing after it
/// is fetched. With a `dedup_key` only the first record per key is kept.
///
/// A cursor that was already visited is fetched again. It is only logged, so
/// a site whose pagination loops needs a cap to terminate.
pub async fn walk<R, T, F>(
    renderer: &mut R,
    scroll: &ScrollSettings,
    start_url: Url,
    extract_page: F,
    max_records: Option<usize>,
    dedup_key: Option<fn(&T) -> String>,
) -> Result<Vec<T>, PartialWalk<T>>
where
    R: Renderer + ?Sized,
    F: Fn(&Html, &Url) -> PageExtract<T>,
{
    let mut records: Vec<T> = vec![];
    let mut seen_keys: HashSet<String> = HashSet::new();
    let mut visited: HashSet<Url> = HashSet::new();
    let mut cursor = Some(start_url);
    let mut page_number = 0;
    let mut dropped = 0;

    let cap_reached = |count: usize| max_records.is_some_and(|max| count >= max);

    if cap_reached(0) {
        return Ok(records);
    }

    while let Some(url) = cursor.take() {
        page_number += 1;
        if !visited.insert(url.clone()) {
            log::warn!(
                "Pagination cursor {} was already visited, fetching it again",
                url
            );
        }

        let markup = match render_page(renderer, scroll, &url).await {
            Ok(markup) => markup,
            Err(fault) => {
                log::error!(
                    "Page {} at {} failed to render, stopping with {} records: {}",
                    page_number,
                    url,
                    records.len(),
                    fault
                );
                return Err(PartialWalk { records, fault });
            }
        };

        let page = {
            let document = Html::parse_document(&markup);
            extract_page(&document, &url)
        };

        let found = page.records.len();
        dropped += page.dropped;

        for record in page.records {
            if cap_reached(records.len()) {
                break;
            }
            if let Some(key) = dedup_key {
                if !seen_keys.insert(key(&record)) {
                    continue;
                }
            }
            records.push(record);
        }

        log::info!(
            "Page {} ({}) had {} records, {} kept so far",
            page_number,
            url,
            found,
            records.len()
        );

        if cap_reached(records.len()) {
            break;
        }
        cursor = page.next;
    }

    if dropped > 0 {
        log::info!("Dropped {} malformed records over {} pages", dropped, page_number);
    }

    Ok(records)
}
