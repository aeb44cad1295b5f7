use serde::Serialize;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemLinkRecord {
    pub name: Option<String>,
    pub link: Url,
}

impl ItemLinkRecord {
    /// Listings repeat the same product under different tracking links, so
    /// the name wins over the link when both are known.
    pub fn uniqueness_key(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.link.to_string(),
        }
    }
}
