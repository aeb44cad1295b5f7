use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use csv::WriterBuilder;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    domain::{DescriptionRecord, ItemLinkRecord, ReviewRecord},
    services::Persistence,
};

const ITEM_LINK_DIR: &str = "item_link";
const ITEM_LINK_HEADER: &[&str] = &["name", "link"];
const DESCRIPTION_HEADER: &[&str] = &["item_link", "description"];
const REVIEW_HEADER: &[&str] = &["rating", "title", "content", "useful_count"];

/// Record sets as CSV files under one output directory:
///
/// ```text
/// {root}/item_link/{category}.csv
/// {root}/{id}/description.csv
/// {root}/{id}/review.csv
/// ```
pub struct CsvStore {
    root: PathBuf,
}

impl CsvStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        CsvStore { root: root.into() }
    }

    pub fn item_links_path(&self, category: &str) -> PathBuf {
        self.root
            .join(ITEM_LINK_DIR)
            .join(format!("{}.csv", category))
    }

    pub fn item_dir(&self, id: Uuid) -> PathBuf {
        self.root.join(id.to_string())
    }

    /// Number of item directories written so far. A missing output directory
    /// counts as zero.
    pub fn harvested_item_count(&self) -> std::io::Result<usize> {
        if !self.root.exists() {
            return Ok(0);
        }

        let mut count = 0;
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() && entry.file_name() != ITEM_LINK_DIR {
                count += 1;
            }
        }

        Ok(count)
    }
}

impl Persistence for CsvStore {
    fn write_item_links(&self, category: &str, records: Vec<ItemLinkRecord>) -> anyhow::Result<()> {
        write_csv(&self.item_links_path(category), ITEM_LINK_HEADER, &records)
    }

    fn write_item(
        &self,
        id: Uuid,
        description: DescriptionRecord,
        reviews: Vec<ReviewRecord>,
    ) -> anyhow::Result<()> {
        let dir = self.item_dir(id);
        write_csv(&dir.join("description.csv"), DESCRIPTION_HEADER, &[description])?;
        write_csv(&dir.join("review.csv"), REVIEW_HEADER, &reviews)
    }
}

// The header is written by hand so an empty record set still gets one.
fn write_csv<T: Serialize>(path: &Path, header: &[&str], records: &[T]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    writer.write_record(header)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}
