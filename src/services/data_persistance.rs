use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

use crate::domain::{DescriptionRecord, ItemLinkRecord, ReviewRecord};

/// Where finished record sets end up.
pub trait Persistence: Send + Sync {
    fn write_item_links(&self, category: &str, records: Vec<ItemLinkRecord>) -> anyhow::Result<()>;

    fn write_item(
        &self,
        id: Uuid,
        description: DescriptionRecord,
        reviews: Vec<ReviewRecord>,
    ) -> anyhow::Result<()>;
}

pub enum PersistantData {
    ItemLinks {
        category: String,
        records: Vec<ItemLinkRecord>,
    },
    Item {
        id: Uuid,
        description: DescriptionRecord,
        reviews: Vec<ReviewRecord>,
    },
}

/// Hands records to [`data_persistance_handler`] so harvesting sessions never
/// write to the store themselves.
#[derive(Clone)]
pub struct PersistantDataSender {
    pub sender: UnboundedSender<PersistantData>,
}

impl Persistence for PersistantDataSender {
    fn write_item_links(&self, category: &str, records: Vec<ItemLinkRecord>) -> anyhow::Result<()> {
        self.sender
            .send(PersistantData::ItemLinks {
                category: category.to_string(),
                records,
            })
            .map_err(|_| anyhow::anyhow!("Data persistance handler has stopped"))
    }

    fn write_item(
        &self,
        id: Uuid,
        description: DescriptionRecord,
        reviews: Vec<ReviewRecord>,
    ) -> anyhow::Result<()> {
        self.sender
            .send(PersistantData::Item {
                id,
                description,
                reviews,
            })
            .map_err(|_| anyhow::anyhow!("Data persistance handler has stopped"))
    }
}

/// Drains the channel into `store` until every sender is dropped. Returns how
/// many writes failed.
pub async fn data_persistance_handler<P: Persistence>(
    mut data_receiver: UnboundedReceiver<PersistantData>,
    store: P,
) -> usize {
    log::info!("Started data persistance handler");
    let mut failures = 0;

    while let Some(data) = data_receiver.recv().await {
        let result = match data {
            PersistantData::ItemLinks { category, records } => {
                log::info!("Saving {} item links for {}", records.len(), category);
                store.write_item_links(&category, records)
            }
            PersistantData::Item {
                id,
                description,
                reviews,
            } => {
                log::info!(
                    "Saving item {} ({}) with {} reviews",
                    id,
                    description.item_link,
                    reviews.len()
                );
                store.write_item(id, description, reviews)
            }
        };

        if let Err(e) = result {
            failures += 1;
            log::error!("Error persisting data: {:?}", e);
        }
    }

    log::info!("Data persistance handler finished with {} failures", failures);
    failures
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tokio::sync::mpsc;
    use url::Url;
    use uuid::Uuid;

    use super::{data_persistance_handler, PersistantDataSender, Persistence};
    use crate::domain::{DescriptionRecord, ItemLinkRecord, ReviewRecord};

    #[derive(Default, Clone)]
    struct Recorder {
        writes: Arc<Mutex<Vec<String>>>,
    }

    impl Persistence for Recorder {
        fn write_item_links(&self, category: &str, records: Vec<ItemLinkRecord>) -> anyhow::Result<()> {
            self.writes
                .lock()
                .unwrap()
                .push(format!("links {} {}", category, records.len()));
            Ok(())
        }

        fn write_item(
            &self,
            _id: Uuid,
            description: DescriptionRecord,
            reviews: Vec<ReviewRecord>,
        ) -> anyhow::Result<()> {
            if reviews.is_empty() {
                anyhow::bail!("refusing item without reviews");
            }
            self.writes
                .lock()
                .unwrap()
                .push(format!("item {} {}", description.item_link, reviews.len()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn handler_writes_everything_sent_then_stops() {
        let (sender, receiver) = mpsc::unbounded_channel();
        let recorder = Recorder::default();
        let handler = tokio::spawn(data_persistance_handler(receiver, recorder.clone()));

        let sink = PersistantDataSender { sender };
        let link = Url::parse("https://www.amazon.co.jp/dp/B0001").unwrap();
        sink.write_item_links(
            "tea",
            vec![ItemLinkRecord {
                name: None,
                link: link.clone(),
            }],
        )
        .unwrap();
        let description = DescriptionRecord {
            item_link: link,
            description: "抹茶".to_string(),
        };
        let review = ReviewRecord {
            rating: 5,
            title: "good".to_string(),
            content: "tasty\n".to_string(),
            useful_count: 0,
        };
        sink.write_item(Uuid::new_v4(), description.clone(), vec![review])
            .unwrap();
        sink.write_item(Uuid::new_v4(), description, vec![]).unwrap();
        drop(sink);

        let failures = handler.await.unwrap();

        assert_eq!(failures, 1);
        assert_eq!(
            *recorder.writes.lock().unwrap(),
            vec!["links tea 1", "item https://www.amazon.co.jp/dp/B0001 1"]
        );
    }

    #[test]
    fn sender_reports_stopped_handler() {
        let (sender, receiver) = mpsc::unbounded_channel();
        drop(receiver);

        let sink = PersistantDataSender { sender };

        assert!(sink.write_item_links("tea", vec![]).is_err());
    }
}
