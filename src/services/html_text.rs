use scraper::{ElementRef, Selector};

/// Tags whose text never reaches the page reader.
pub const NON_CONTENT_TAGS: &[&str] = &["style", "script", "noscript"];

/// Parses one of the fixed CSS locators. They are literals, so failure is a bug.
pub fn parse_selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {:?}: {}", css, e))
}

/// Text nodes below `element` in document order, skipping any subtree rooted
/// at one of `skip_tags`.
pub fn text_nodes(element: ElementRef, skip_tags: &[&str]) -> Vec<String> {
    let mut nodes = vec![];
    collect_text_nodes(element, skip_tags, &mut nodes);
    nodes
}

/// All visible text of `element` glued together and trimmed.
pub fn element_text(element: ElementRef, skip_tags: &[&str]) -> String {
    text_nodes(element, skip_tags).concat().trim().to_string()
}

fn collect_text_nodes(element: ElementRef, skip_tags: &[&str], nodes: &mut Vec<String>) {
    for child in element.children() {
        match ElementRef::wrap(child) {
            Some(child_element) => {
                if !skip_tags.contains(&child_element.value().name()) {
                    collect_text_nodes(child_element, skip_tags, nodes);
                }
            }
            None => {
                if let Some(text) = child.value().as_text() {
                    let text: &str = text;
                    nodes.push(text.to_string());
                }
            }
        }
    }
}
