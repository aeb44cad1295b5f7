use serde::Serialize;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescriptionRecord {
    pub item_link: Url,
    pub description: String,
}
