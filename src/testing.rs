//! In-memory stand-ins for the renderer and the store.

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    domain::{DescriptionRecord, ItemLinkRecord, ReviewRecord},
    error::RenderFault,
    services::{Persistence, Renderer, ScrollSettings},
};

/// Serves canned markup by URL, fails navigation to the pages marked broken
/// and remembers every navigation.
#[derive(Default)]
pub struct FakeSite {
    pages: HashMap<String, String>,
    broken: HashSet<String>,
    delay: Duration,
    current: Option<String>,
    pub navigations: Vec<String>,
}

impl FakeSite {
    pub fn new<U: ToString, M: ToString>(pages: Vec<(U, M)>) -> Self {
        FakeSite {
            pages: pages
                .into_iter()
                .map(|(url, markup)| (url.to_string(), markup.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    pub fn break_page(mut self, url: &str) -> Self {
        self.broken.insert(url.to_string());
        self
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl Renderer for FakeSite {
    async fn navigate(&mut self, url: &str) -> Result<(), RenderFault> {
        self.navigations.push(url.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.broken.contains(url) {
            return Err(RenderFault::navigation(url, "connection reset"));
        }
        self.current = Some(url.to_string());
        Ok(())
    }

    async fn current_document(&mut self) -> Result<String, RenderFault> {
        Ok(self
            .current
            .as_ref()
            .and_then(|url| self.pages.get(url))
            .cloned()
            .unwrap_or_default())
    }

    async fn viewport_height(&mut self) -> Result<i64, RenderFault> {
        Ok(800)
    }

    async fn document_height(&mut self) -> Result<i64, RenderFault> {
        Ok(600)
    }

    async fn scroll_to(&mut self, _y: i64) -> Result<(), RenderFault> {
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MemoryStore {
    pub item_links: Arc<Mutex<Vec<(String, Vec<ItemLinkRecord>)>>>,
    pub items: Arc<Mutex<Vec<(Uuid, DescriptionRecord, Vec<ReviewRecord>)>>>,
}

impl Persistence for MemoryStore {
    fn write_item_links(&self, category: &str, records: Vec<ItemLinkRecord>) -> anyhow::Result<()> {
        self.item_links
            .lock()
            .unwrap()
            .push((category.to_string(), records));
        Ok(())
    }

    fn write_item(
        &self,
        id: Uuid,
        description: DescriptionRecord,
        reviews: Vec<ReviewRecord>,
    ) -> anyhow::Result<()> {
        self.items.lock().unwrap().push((id, description, reviews));
        Ok(())
    }
}

pub fn instant_scroll() -> ScrollSettings {
    ScrollSettings {
        viewport_fraction: 0.8,
        step_delay: Duration::ZERO,
        settle_delay: Duration::ZERO,
    }
}
