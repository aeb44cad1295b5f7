use std::sync::Arc;

use anyhow::Context;
use env_logger::Env;
use sift::{
    configuration::get_configuration,
    dal::CsvStore,
    services::{
        data_persistance_handler, harvest_in_parallel, Droid, Harvester, PersistantData,
        PersistantDataSender,
    },
};
use tokio::sync::mpsc;
use url::Url;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().context("Failed to read configuration.")?;
    let start_url = Url::parse(&configuration.crawl.start_url)
        .with_context(|| format!("Invalid start url {}", configuration.crawl.start_url))?;

    let (persistant_data_sender, persistant_data_receiver) =
        mpsc::unbounded_channel::<PersistantData>();
    let store = CsvStore::new(&configuration.output.directory);
    let persistance_handler =
        tokio::spawn(async move { data_persistance_handler(persistant_data_receiver, store).await });

    let harvester = Arc::new(Harvester::new(
        &configuration.crawl,
        configuration.scroll.to_settings(),
        Arc::new(PersistantDataSender {
            sender: persistant_data_sender,
        }),
    ));

    let session_count = configuration.webdriver.sessions.max(1);
    let mut sessions = Vec::with_capacity(session_count);
    for _ in 0..session_count {
        let droid = Droid::new(&configuration.webdriver)
            .await
            .with_context(|| format!("Failed to open a session on {}", configuration.webdriver.url))?;
        sessions.push(droid);
    }
    log::info!("Opened {} browser sessions", sessions.len());

    let links = match harvester
        .discover_item_links(
            &mut sessions[0],
            start_url,
            configuration.crawl.target_item_count,
        )
        .await
    {
        Ok(links) => links,
        Err(partial) => {
            log::error!(
                "Listing walk stopped early, continuing with {} item links: {}",
                partial.records.len(),
                partial.fault
            );
            partial.records
        }
    };
    log::info!(
        "Found {} item links for {}",
        links.len(),
        configuration.crawl.category
    );

    if let Err(e) = harvester.save_item_links(&configuration.crawl.category, links.clone()) {
        log::error!("Error saving item links: {:?}", e);
    }

    let (report, sessions) = harvest_in_parallel(harvester.clone(), sessions, links).await;
    log::info!(
        "Harvest finished: {} persisted, {} without description, {} failed",
        report.persisted.len(),
        report.skipped.len(),
        report.failed.len()
    );
    for failure in &report.failed {
        log::warn!("Failed item {}: {}", failure.link, failure.fault);
    }

    for session in sessions {
        if let Err(e) = session.quit().await {
            log::warn!("Error closing browser session: {:?}", e);
        }
    }

    // The handler stops once the last sender is gone.
    drop(harvester);
    let failures = persistance_handler
        .await
        .context("Data persistance handler panicked")?;
    if failures > 0 {
        log::error!("{} writes failed", failures);
    }

    let store = CsvStore::new(&configuration.output.directory);
    log::info!(
        "{} items harvested in {}",
        store.harvested_item_count()?,
        configuration.output.directory.display()
    );

    Ok(())
}
