//! Queue of submitted product queries waiting to be merged into the inbox

use anyhow::{Context, Result};

use super::KvStore;
use crate::constants::PENDING_QUERIES_KEY;
use crate::query::ProductQuery;

/// JSON array of ProductQuery records under a single key
#[derive(Clone)]
pub struct PendingQueries {
    store: KvStore,
}

impl PendingQueries {
    pub fn new(store: KvStore) -> Self {
        Self { store }
    }

    pub async fn enqueue(&self, query: &ProductQuery) -> Result<()> {
        let record = serde_json::to_value(query).context("Failed to serialize product query")?;

        self.store
            .update(PENDING_QUERIES_KEY, |current| {
                let mut entries = match current {
                    Some(text) => parse_entries(&text)
                        .context("Pending query queue is corrupt; refusing to overwrite it")?,
                    None => Vec::new(),
                };
                entries.push(record);
                Ok(serde_json::to_string(&entries)?)
            })
            .await
            .context("Failed to enqueue product query")?;

        tracing::debug!("Queued product query {}", query.id);
        Ok(())
    }

    /// Remove and return everything queued. Each query is returned by
    /// exactly one drain.
    pub async fn drain(&self) -> Result<Vec<ProductQuery>> {
        let Some(text) = self
            .store
            .take(PENDING_QUERIES_KEY)
            .await
            .context("Failed to read pending product queries")?
        else {
            return Ok(Vec::new());
        };

        let entries = match parse_entries(&text) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Pending query queue is not a JSON array, discarding: {}", e);
                return Ok(Vec::new());
            }
        };

        let queries = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<ProductQuery>(entry) {
                Ok(q) => Some(q),
                Err(e) => {
                    tracing::warn!("Dropping unreadable product query: {}", e);
                    None
                }
            })
            .collect();
        Ok(queries)
    }

    /// Number of queries waiting to be merged
    pub async fn len(&self) -> Result<usize> {
        match self.store.get(PENDING_QUERIES_KEY).await? {
            Some(text) => Ok(parse_entries(&text)?.len()),
            None => Ok(0),
        }
    }
}

/// Entries are kept as raw values so one bad record cannot poison the rest
fn parse_entries(text: &str) -> serde_json::Result<Vec<serde_json::Value>> {
    serde_json::from_str::<Vec<serde_json::Value>>(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryForm;

    fn query(name: &str) -> ProductQuery {
        QueryForm {
            name: name.into(),
            email: "someone@example.com".into(),
            query_topic: "other".into(),
            urgency_level: "Low".into(),
            message: "Just wondering about the roadmap.".into(),
        }
        .validate()
        .unwrap()
    }

    #[tokio::test]
    async fn test_enqueue_then_drain_once() {
        let queue = PendingQueries::new(KvStore::open_in_memory().await.unwrap());
        queue.enqueue(&query("First")).await.unwrap();
        queue.enqueue(&query("Second")).await.unwrap();
        assert_eq!(queue.len().await.unwrap(), 2);

        let drained = queue.drain().await.unwrap();
        let names: Vec<_> = drained.iter().map(|q| q.submitter_name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second"]);

        assert!(queue.drain().await.unwrap().is_empty());
        assert_eq!(queue.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_drain_skips_bad_records() {
        let store = KvStore::open_in_memory().await.unwrap();
        let good = serde_json::to_string(&query("Good")).unwrap();
        store
            .set(
                PENDING_QUERIES_KEY,
                &format!(r#"[{{"id":"broken"}},{}]"#, good),
            )
            .await
            .unwrap();

        let drained = PendingQueries::new(store).drain().await.unwrap();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].submitter_name, "Good");
    }

    #[tokio::test]
    async fn test_enqueue_refuses_to_overwrite_corrupt_queue() {
        let store = KvStore::open_in_memory().await.unwrap();
        store
            .set(PENDING_QUERIES_KEY, r#"{"id":"not-an-array"}"#)
            .await
            .unwrap();

        let queue = PendingQueries::new(store.clone());
        assert!(queue.enqueue(&query("Late")).await.is_err());

        // The stored value is left exactly as it was
        assert_eq!(
            store.get(PENDING_QUERIES_KEY).await.unwrap().as_deref(),
            Some(r#"{"id":"not-an-array"}"#)
        );
    }

    #[tokio::test]
    async fn test_reads_records_written_by_web_form() {
        let store = KvStore::open_in_memory().await.unwrap();
        store
            .set(
                PENDING_QUERIES_KEY,
                r#"[{"id":"prod_inq_1717000000000","timestamp":"2024-05-29T16:26:40.000Z",
                    "submitterName":"Dana","submitterEmail":"dana@example.com",
                    "queryTopic":"account_access","urgencyLevel":"Medium",
                    "message":"Cannot log in since yesterday."}]"#,
            )
            .await
            .unwrap();

        let drained = PendingQueries::new(store).drain().await.unwrap();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].id, "prod_inq_1717000000000");
        assert_eq!(drained[0].query_topic, crate::query::QueryTopic::AccountAccess);
    }
}
