use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewRecord {
    pub rating: u8,
    pub title: String,
    pub content: String,
    pub useful_count: u64,
}
