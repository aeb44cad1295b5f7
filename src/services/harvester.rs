use std::{
    collections::{HashSet, VecDeque},
    sync::{Arc, Mutex},
    time::Duration,
};

use scraper::Html;
use url::Url;
use uuid::Uuid;

use crate::{
    configuration::CrawlSettings,
    domain::ItemLinkRecord,
    error::{ItemFault, PartialWalk, RenderFault},
};

use super::{
    extract_description, extract_item_links, render_page, review_entry_point, walk, Persistence,
    Renderer, ReviewScraper, ScrollSettings,
};

#[derive(Debug)]
pub enum ItemOutcome {
    Persisted(Uuid),
    NoDescription,
}

#[derive(Debug)]
pub struct ItemFailure {
    pub link: Url,
    pub fault: ItemFault,
}

#[derive(Debug, Default)]
pub struct HarvestReport {
    pub persisted: Vec<(Uuid, Url)>,
    pub skipped: Vec<Url>,
    pub failed: Vec<ItemFailure>,
}

impl HarvestReport {
    fn merge(&mut self, other: HarvestReport) {
        self.persisted.extend(other.persisted);
        self.skipped.extend(other.skipped);
        self.failed.extend(other.failed);
    }
}

/// Link discovery and per-item description + review harvesting.
pub struct Harvester<P: ?Sized> {
    pub scroll: ScrollSettings,
    pub reviews: ReviewScraper,
    pub max_reviews_per_item: Option<usize>,
    pub item_timeout: Option<Duration>,
    pub store: Arc<P>,
}

impl<P: Persistence + ?Sized> Harvester<P> {
    pub fn new(crawl: &CrawlSettings, scroll: ScrollSettings, store: Arc<P>) -> Self {
        Harvester {
            scroll,
            reviews: ReviewScraper::new(crawl.helpful_suffixes.clone()),
            max_reviews_per_item: crawl.max_reviews_per_item,
            item_timeout: crawl.item_timeout(),
            store,
        }
    }

    /// Walks the listing pages from `start_url` until `target` distinct items
    /// are found or the listing ends.
    pub async fn discover_item_links<R: Renderer + ?Sized>(
        &self,
        renderer: &mut R,
        start_url: Url,
        target: usize,
    ) -> Result<Vec<ItemLinkRecord>, PartialWalk<ItemLinkRecord>> {
        log::info!("Discovering up to {} item links from {}", target, start_url);

        walk(
            renderer,
            &self.scroll,
            start_url,
            extract_item_links,
            Some(target),
            Some(ItemLinkRecord::uniqueness_key),
        )
        .await
    }

    pub fn save_item_links(&self, category: &str, links: Vec<ItemLinkRecord>) -> anyhow::Result<()> {
        self.store.write_item_links(category, links)
    }

    /// Description and reviews of one item, persisted under a fresh id.
    ///
    /// An item without a description is skipped before its reviews are
    /// touched. Nothing is persisted for an item whose review walk fails.
    pub async fn harvest_item<R: Renderer + ?Sized>(
        &self,
        renderer: &mut R,
        link: &Url,
    ) -> Result<ItemOutcome, ItemFault> {
        let markup = render_page(renderer, &self.scroll, link).await?;
        let (description, review_entry) = {
            let document = Html::parse_document(&markup);
            (
                extract_description(&document, link),
                review_entry_point(&document, link),
            )
        };

        let Some(description) = description else {
            log::info!("No description on {}, skipping item", link);
            return Ok(ItemOutcome::NoDescription);
        };

        let reviews = match review_entry {
            Some(entry) => walk(
                renderer,
                &self.scroll,
                entry,
                |document, page_url| self.reviews.extract_reviews(document, page_url),
                self.max_reviews_per_item,
                None,
            )
            .await
            .map_err(|partial| ItemFault::Reviews {
                collected: partial.records.len(),
                fault: partial.fault,
            })?,
            None => {
                log::info!("No review section on {}", link);
                vec![]
            }
        };

        let id = Uuid::new_v4();
        self.store
            .write_item(id, description, reviews)
            .map_err(ItemFault::Persistence)?;

        Ok(ItemOutcome::Persisted(id))
    }

    async fn harvest_item_bounded<R: Renderer + ?Sized>(
        &self,
        renderer: &mut R,
        link: &Url,
    ) -> Result<ItemOutcome, ItemFault> {
        match self.item_timeout {
            Some(after) => tokio::time::timeout(after, self.harvest_item(renderer, link))
                .await
                .unwrap_or_else(|_| {
                    Err(ItemFault::Render(RenderFault::Timeout {
                        url: link.to_string(),
                        after,
                    }))
                }),
            None => self.harvest_item(renderer, link).await,
        }
    }

    /// Harvests every distinct link on one session. A failing item is
    /// recorded and the run moves on.
    pub async fn harvest_items<R: Renderer + ?Sized>(
        &self,
        renderer: &mut R,
        links: Vec<ItemLinkRecord>,
    ) -> HarvestReport {
        let mut report = HarvestReport::default();

        for link in distinct_links(links) {
            let result = self.harvest_item_bounded(renderer, &link).await;
            record_outcome(&mut report, link, result);
        }

        report
    }
}

/// Spreads the links over one worker per session. Sessions share only the
/// work queue and the store. The sessions are handed back for shutdown,
/// except those whose worker panicked.
pub async fn harvest_in_parallel<R, P>(
    harvester: Arc<Harvester<P>>,
    sessions: Vec<R>,
    links: Vec<ItemLinkRecord>,
) -> (HarvestReport, Vec<R>)
where
    R: Renderer + 'static,
    P: Persistence + ?Sized + 'static,
{
    let queue: Arc<Mutex<VecDeque<Url>>> = Arc::new(Mutex::new(distinct_links(links).collect()));
    log::info!(
        "Harvesting {} items on {} sessions",
        queue.lock().map(|q| q.len()).unwrap_or_default(),
        sessions.len()
    );

    let workers: Vec<_> = sessions
        .into_iter()
        .enumerate()
        .map(|(worker, mut session)| {
            let harvester = harvester.clone();
            let queue = queue.clone();
            tokio::spawn(async move {
                let mut report = HarvestReport::default();
                loop {
                    let next = queue
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner())
                        .pop_front();
                    let Some(link) = next else {
                        break;
                    };
                    log::info!("Worker {} harvesting {}", worker, link);
                    let result = harvester.harvest_item_bounded(&mut session, &link).await;
                    record_outcome(&mut report, link, result);
                }
                (report, session)
            })
        })
        .collect();

    let mut report = HarvestReport::default();
    let mut sessions = vec![];
    for worker in workers {
        match worker.await {
            Ok((worker_report, session)) => {
                report.merge(worker_report);
                sessions.push(session);
            }
            Err(e) => log::error!("Harvest worker stopped unexpectedly: {:?}", e),
        }
    }

    (report, sessions)
}

fn record_outcome(report: &mut HarvestReport, link: Url, result: Result<ItemOutcome, ItemFault>) {
    match result {
        Ok(ItemOutcome::Persisted(id)) => report.persisted.push((id, link)),
        Ok(ItemOutcome::NoDescription) => report.skipped.push(link),
        Err(fault) => {
            log::error!("Item {} failed: {}", link, fault);
            report.failed.push(ItemFailure { link, fault });
        }
    }
}

fn distinct_links(links: Vec<ItemLinkRecord>) -> impl Iterator<Item = Url> {
    let mut seen = HashSet::new();
    links
        .into_iter()
        .map(|record| record.link)
        .filter(move |link| seen.insert(link.clone()))
}
