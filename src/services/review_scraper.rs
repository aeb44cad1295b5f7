use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::domain::{PageExtract, ReviewRecord};

use super::{
    html_text::{element_text, parse_selector, NON_CONTENT_TAGS},
    normalizer::normalize,
};

static REVIEW: LazyLock<Selector> = LazyLock::new(|| parse_selector(r#"div[data-hook="review"]"#));
static RATING: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector(r#"i[data-hook="review-star-rating"], i[data-hook="cmps-review-star-rating"]"#)
});
static TITLE: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector(r#"a[data-hook="review-title"], span[data-hook="review-title"]"#)
});
static CONTENT: LazyLock<Selector> =
    LazyLock::new(|| parse_selector(r#"span[data-hook="review-body"]"#));
static HELPFUL: LazyLock<Selector> =
    LazyLock::new(|| parse_selector(r#"span[data-hook="helpful-vote-statement"]"#));
static NEXT_PAGE: LazyLock<Selector> =
    LazyLock::new(|| parse_selector("ul.a-pagination li.a-last a[href]"));
static ALL_REVIEWS: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector(
        r#"a[data-hook="see-all-reviews-link-foot"][href], a[data-hook="see-all-reviews-link"][href]"#,
    )
});

static STAR_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"star-(\d+)").expect("star pattern is valid"));

// The star icon inside a title carries the rating as alt text.
const TITLE_SKIP_TAGS: &[&str] = &["i", "style", "script"];

pub struct ReviewScraper {
    helpful_suffixes: Vec<String>,
}

impl ReviewScraper {
    pub fn new(helpful_suffixes: Vec<String>) -> Self {
        ReviewScraper { helpful_suffixes }
    }

    /// Reviews on one review page plus the link to the next review page.
    ///
    /// Reviews without a rating, title or content are dropped and counted.
    pub fn extract_reviews(&self, document: &Html, page_url: &Url) -> PageExtract<ReviewRecord> {
        let mut records = vec![];
        let mut dropped = 0;

        for review in document.select(&REVIEW) {
            match self.extract_review(review) {
                Some(record) => records.push(record),
                None => {
                    log::debug!(
                        "Dropping review {:?} on {}: missing rating, title or content",
                        review.value().attr("id"),
                        page_url
                    );
                    dropped += 1;
                }
            }
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

    fn extract_review(&self, review: ElementRef) -> Option<ReviewRecord> {
        let rating = review
            .select(&RATING)
            .next()
            .and_then(|icon| icon.value().attr("class"))
            .and_then(parse_star_rating)?;

        let title = review
            .select(&TITLE)
            .next()
            .map(|title| normalize(&element_text(title, TITLE_SKIP_TAGS)).trim().to_string())
            .filter(|title| !title.is_empty())?;

        let content = review
            .select(&CONTENT)
            .next()
            .map(|body| normalize(&element_text(body, NON_CONTENT_TAGS)))
            .filter(|content| !content.trim().is_empty())?;

        let useful_count = review
            .select(&HELPFUL)
            .next()
            .map(|counter| parse_useful_count(&element_text(counter, NON_CONTENT_TAGS), &self.helpful_suffixes))
            .unwrap_or(0);

        Some(ReviewRecord {
            rating,
            title,
            content,
            useful_count,
        })
    }
}

/// Link from a detail page to its full review listing.
pub fn review_entry_point(document: &Html, item_link: &Url) -> Option<Url> {
    document
        .select(&ALL_REVIEWS)
        .next()
        .and_then(|anchor| anchor.value().attr("href"))
        .and_then(|href| item_link.join(href).ok())
}

/// Rating from the first `star-<n>` token of a class attribute.
pub fn parse_star_rating(class: &str) -> Option<u8> {
    STAR_CLASS
        .captures(class)
        .and_then(|captures| captures[1].parse::<u8>().ok())
        .filter(|rating| (1..=5).contains(rating))
}

/// Count from a "found helpful" statement such as
/// `1,234人のお客様がこれが役に立ったと考えています`.
pub fn parse_useful_count(text: &str, suffixes: &[String]) -> u64 {
    let text = text.trim();
    let count = suffixes
        .iter()
        .find_map(|suffix| text.strip_suffix(suffix.as_str()))
        .unwrap_or(text);

    let digits: String = count
        .chars()
        .filter(|c| !matches!(c, ',' | '，' | ' '))
        .collect();

    // English pages spell out the singular: "One person found this helpful".
    if digits.eq_ignore_ascii_case("one") {
        return 1;
    }

    match digits.parse::<u64>() {
        Ok(count) => count,
        Err(_) => {
            log::debug!("Unrecognised helpful counter {:?}, counting 0", text);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::Html;
    use url::Url;

    use super::{parse_star_rating, parse_useful_count, review_entry_point, ReviewScraper};

    fn suffixes() -> Vec<String> {
        vec![
            "人のお客様がこれが役に立ったと考えています".to_string(),
            "people found this helpful".to_string(),
            "person found this helpful".to_string(),
        ]
    }

    fn review(id: &str, stars: u8, title: Option<&str>, body: Option<&str>, helpful: Option<&str>) -> String {
        format!(
            r#"<div id="{id}" data-hook="review">
                 <i data-hook="review-star-rating" class="a-icon a-icon-star a-star-{stars} review-rating"><span class="a-icon-alt">5つ星のうち{stars}.0</span></i>
                 {title}
                 {body}
                 {helpful}
               </div>"#,
            title = title
                .map(|t| format!(r#"<a data-hook="review-title" href="/gp/customer-reviews/{id}"><i class="a-icon a-icon-star"><span class="a-icon-alt">5つ星のうち{stars}.0</span></i><span class="a-letter-space"></span><span>{t}</span></a>"#))
                .unwrap_or_default(),
            body = body
                .map(|b| format!(r#"<span data-hook="review-body"><span>{b}</span></span>"#))
                .unwrap_or_default(),
            helpful = helpful
                .map(|h| format!(r#"<span data-hook="helpful-vote-statement">{h}</span>"#))
                .unwrap_or_default(),
        )
    }

    fn page_url() -> Url {
        Url::parse("https://www.amazon.co.jp/product-reviews/B00JGKNS86/?pageNumber=1").unwrap()
    }

    #[test]
    fn extracts_reviews_and_next_page() {
        let html = format!(
            r#"<div id="cm_cr-review_list">{}{}</div>
               <ul class="a-pagination"><li class="a-last"><a href="/product-reviews/B00JGKNS86/?pageNumber=2">次へ</a></li></ul>"#,
            review("R1", 5, Some("美味しい！"), Some("抹茶の香りが良い。<br>また買います。"), Some("1,234人のお客様がこれが役に立ったと考えています")),
            review("R2", 2, Some("Too Sweet"), Some("Not for me."), None),
        );
        let document = Html::parse_document(&html);
        let scraper = ReviewScraper::new(suffixes());

        let page = scraper.extract_reviews(&document, &page_url());

        assert_eq!(page.records.len(), 2);
        assert_eq!(page.records[0].rating, 5);
        assert_eq!(page.records[0].title, "美味しい");
        assert_eq!(page.records[0].content, "抹茶の香りが良い\nまた買います\n");
        assert_eq!(page.records[0].useful_count, 1234);
        assert_eq!(page.records[1].title, "too sweet");
        assert_eq!(page.records[1].useful_count, 0);
        assert_eq!(
            page.next.unwrap().as_str(),
            "https://www.amazon.co.jp/product-reviews/B00JGKNS86/?pageNumber=2"
        );
    }

    #[test]
    fn review_without_title_is_dropped() {
        let html = format!(
            "{}{}{}",
            review("R1", 4, Some("Nice"), Some("Good foam."), None),
            review("R2", 3, None, Some("No title here."), None),
            review("R3", 1, Some("Bad"), Some("Leaked."), None),
        );
        let document = Html::parse_document(&html);

        let page = ReviewScraper::new(suffixes()).extract_reviews(&document, &page_url());

        assert_eq!(page.records.len(), 2);
        assert_eq!(page.dropped, 1);
        assert_eq!(page.records[0].title, "nice");
        assert_eq!(page.records[1].title, "bad");
        assert_eq!(page.next, None);
    }

    #[test]
    fn markup_boundaries_add_no_newlines() {
        let html = review(
            "R1",
            4,
            Some("Nice"),
            Some("香りが良い<br><span>泡立ちも良い。</span><br>リピートします"),
            None,
        );
        let document = Html::parse_document(&html);

        let page = ReviewScraper::new(suffixes()).extract_reviews(&document, &page_url());

        assert_eq!(page.records[0].content, "香りが良い泡立ちも良い\nリピートします");
    }

    #[test]
    fn review_with_empty_content_is_dropped() {
        let html = review("R1", 4, Some("Nice"), Some("！！"), None);
        let document = Html::parse_document(&html);

        let page = ReviewScraper::new(suffixes()).extract_reviews(&document, &page_url());

        assert!(page.records.is_empty());
        assert_eq!(page.dropped, 1);
    }

    #[test]
    fn star_rating_takes_first_match() {
        assert_eq!(parse_star_rating("a-icon a-icon-star a-star-4 review-rating"), Some(4));
        assert_eq!(parse_star_rating("a-star-3 a-star-5"), Some(3));
        assert_eq!(parse_star_rating("a-icon a-icon-star"), None);
        assert_eq!(parse_star_rating("a-star-0"), None);
    }

    #[test]
    fn useful_count_strips_suffix_and_separators() {
        assert_eq!(parse_useful_count("15人のお客様がこれが役に立ったと考えています", &suffixes()), 15);
        assert_eq!(parse_useful_count(" 2,048 people found this helpful ", &suffixes()), 2048);
        assert_eq!(parse_useful_count("One person found this helpful", &suffixes()), 1);
        assert_eq!(parse_useful_count("Helpful", &suffixes()), 0);
    }

    #[test]
    fn entry_point_resolves_relative_link() {
        let document = Html::parse_document(
            r#"<a data-hook="see-all-reviews-link-foot" href="/product-reviews/B00JGKNS86/ref=cm_cr_dp_d_show_all_btm">すべてのレビューを参照します</a>"#,
        );
        let item = Url::parse("https://www.amazon.co.jp/dp/B00JGKNS86").unwrap();

        assert_eq!(
            review_entry_point(&document, &item).unwrap().as_str(),
            "https://www.amazon.co.jp/product-reviews/B00JGKNS86/ref=cm_cr_dp_d_show_all_btm"
        );
        assert_eq!(review_entry_point(&Html::parse_document("<p></p>"), &item), None);
    }
}
