use std::{
    ops::{Range, RangeInclusive},
    sync::LazyLock,
};

use regex::Regex;

/// Characters that end a sentence. Runs of them become runs of newlines of
/// the same length.
pub const SENTENCE_TERMINATORS: &[char] = &['。', '．', '.', '？', '?', '！', '!', '、', '，'];

/// Section headings that carry no product information.
pub const BOILERPLATE_PHRASES: &[&str] = &[
    "商品の説明",
    "この商品について",
    "商品紹介",
    "メーカーによる説明",
    "product description",
    "Product Description",
    "about this item",
    "About this item",
    "from the manufacturer",
    "From the manufacturer",
];

pub const EMOJI_RANGES: &[RangeInclusive<char>] = &[
    '\u{1F000}'..='\u{1FAFF}',
    '\u{2600}'..='\u{27BF}',
    '\u{2300}'..='\u{23FF}',
    '\u{2B00}'..='\u{2BFF}',
    '\u{FE00}'..='\u{FE0F}',
    '\u{200D}'..='\u{200D}',
    '\u{20E3}'..='\u{20E3}',
    '\u{E0020}'..='\u{E007F}',
];

pub const HALF_WIDTH_SYMBOLS: &[char] = &[
    '"', '\'', '`', '(', ')', '[', ']', '{', '}', '<', '>', '#', '$', '%', '&', '*', '+', '=',
    '|', '\\', '/', '^', '_', '~', '@', ':', ';', '¥', '€', '£', '¢', '•', '●', '○', '■', '□',
    '◆', '◇', '▲', '△', '▼', '▽', '★', '☆', '※', '→', '←', '↑', '↓', '“', '”', '‘', '’', '«',
    '»', '·', '…',
];

/// Full-width punctuation: CJK symbols (keeping the iteration marks) and the
/// non-alphanumeric parts of the full-width forms block.
pub const FULL_WIDTH_SYMBOL_RANGES: &[RangeInclusive<char>] = &[
    '\u{3000}'..='\u{3004}',
    '\u{3008}'..='\u{3020}',
    '\u{3030}'..='\u{3030}',
    '\u{30FB}'..='\u{30FB}',
    '\u{FF01}'..='\u{FF0F}',
    '\u{FF1A}'..='\u{FF20}',
    '\u{FF3B}'..='\u{FF40}',
    '\u{FF5B}'..='\u{FF65}',
    '\u{FFE0}'..='\u{FFEE}',
];

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://[A-Za-z0-9./:%#$&?()~=+\-_,;@!*']+").expect("URL pattern is valid")
});

// Sentence punctuation right after a URL belongs to the sentence.
const URL_TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '\''];

/// Canonical form of free text: one newline per sentence terminator,
/// lowercase, no URLs, no emoji, no symbols.
pub fn normalize(raw: &str) -> String {
    let urls = url_spans(raw);
    let mut normalized = String::with_capacity(raw.len());

    for (offset, c) in raw.char_indices() {
        if urls.iter().any(|span| span.contains(&offset)) {
            continue;
        }

        let c = match SENTENCE_TERMINATORS.contains(&c) || c == '\r' {
            true => '\n',
            false => c,
        };

        normalized.extend(
            c.to_lowercase()
                .filter(|c| !is_emoji(*c))
                .filter(|c| !HALF_WIDTH_SYMBOLS.contains(c))
                .filter(|c| !is_full_width_symbol(*c)),
        );
    }

    normalized
}

/// Byte ranges of the URLs in `text`, located before any character is
/// folded so dots inside a URL stay distinguishable from sentence ends.
fn url_spans(text: &str) -> Vec<Range<usize>> {
    URL_PATTERN
        .find_iter(text)
        .map(|m| {
            let url = m.as_str().trim_end_matches(URL_TRAILING_PUNCTUATION);
            m.start()..m.start() + url.len()
        })
        .collect()
}

/// Strips known section headings. Only used on description text.
pub fn remove_boilerplate(text: &str) -> String {
    BOILERPLATE_PHRASES
        .iter()
        .fold(text.to_string(), |acc, phrase| acc.replace(phrase, ""))
}

fn is_emoji(c: char) -> bool {
    EMOJI_RANGES.iter().any(|range| range.contains(&c))
}

fn is_full_width_symbol(c: char) -> bool {
    FULL_WIDTH_SYMBOL_RANGES.iter().any(|range| range.contains(&c))
}
