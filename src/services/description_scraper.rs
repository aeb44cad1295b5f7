use std::sync::LazyLock;

use scraper::{Html, Selector};
use url::Url;

use crate::domain::DescriptionRecord;

use super::{
    html_text::{parse_selector, text_nodes, NON_CONTENT_TAGS},
    normalizer::{normalize, remove_boilerplate},
};

/// Feature bullets, plain product description, then the rich-media block.
pub const DESCRIPTION_CONTAINERS: [&str; 3] = ["#feature-bullets", "#productDescription", "#aplus"];

static CONTAINERS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    DESCRIPTION_CONTAINERS
        .iter()
        .map(|css| parse_selector(css))
        .collect()
});

/// Normalized description of a detail page, `None` when none of the known
/// containers is present or all of them are empty once normalized.
pub fn extract_description(document: &Html, item_link: &Url) -> Option<DescriptionRecord> {
    let sections: Vec<String> = CONTAINERS
        .iter()
        .filter_map(|container| document.select(container).next())
        .map(|container| {
            text_nodes(container, NON_CONTENT_TAGS)
                .iter()
                .map(|text| normalize(remove_boilerplate(text.trim()).trim()))
                .filter(|text| !text.trim().is_empty())
                .collect::<Vec<String>>()
                .join("\n")
                .trim_end_matches('\n')
                .to_string()
        })
        .filter(|section| !section.trim().is_empty())
        .collect();

    match sections.is_empty() {
        true => None,
        false => Some(DescriptionRecord {
            item_link: item_link.clone(),
            description: sections.join("\n"),
        }),
    }
}
