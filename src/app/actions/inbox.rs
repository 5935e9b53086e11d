//! Working set lifecycle: merging submitted queries and triage

use anyhow::Result;

use crate::store::PendingQueries;
use crate::support::Priority;
use crate::triage;

use super::super::App;

impl App {
    /// Pull submitted product queries out of the store and add them as
    /// inquiries. The queue is emptied by the same statement that reads it.
    pub async fn merge_pending(&mut self, queue: &PendingQueries) -> Result<usize> {
        let queries = queue.drain().await?;

        let mut merged = 0;
        for query in queries {
            if self.inquiry(&query.id).is_some() {
                tracing::warn!("Skipping product query {}: id already in the inbox", query.id);
                continue;
            }
            self.inquiries.push(query.into_inquiry());
            merged += 1;
        }

        tracing::info!("Merged {} submitted product queries", merged);
        Ok(merged)
    }

    /// Annotate unprioritized inquiries, then re-rank the inbox
    pub async fn triage(&mut self) -> usize {
        let annotated =
            triage::annotate_pending(&mut self.inquiries, &self.customers, &self.flows).await;
        self.rank();
        annotated
    }

    pub fn rank(&mut self) {
        triage::rank(&mut self.inquiries, self.inbox.tie_break);
    }

    /// Startup sequence: merge the queue, then triage. Nothing is selected.
    pub async fn bootstrap(&mut self, queue: &PendingQueries) -> Result<usize> {
        let merged = self.merge_pending(queue).await?;
        self.triage().await;
        Ok(merged)
    }

    pub async fn reprioritize(&mut self, id: &str) -> Option<Priority> {
        let priority =
            triage::reprioritize(&mut self.inquiries, id, &self.customers, &self.flows).await;
        self.rank();
        priority
    }
}

#[cfg(test)]
mod tests {
    use crate::ai::PRIORITIZE_SYSTEM;
    use crate::ai::testing::{Script, ScriptedBackend};
    use crate::app::state::SessionPhase;
    use crate::app::testing::{app_with, backend_with_defaults};
    use crate::query::QueryForm;
    use crate::store::{KvStore, PendingQueries};
    use crate::support::{Channel, CustomerRef};

    fn submitted_query() -> crate::query::ProductQuery {
        QueryForm {
            name: "Dana Scully".into(),
            email: "dana@example.com".into(),
            query_topic: "technical_support".into(),
            urgency_level: "High".into(),
            message: "The export button does nothing.".into(),
        }
        .validate()
        .unwrap()
    }

    #[tokio::test]
    async fn test_submitted_query_merges_exactly_once() {
        let queue = PendingQueries::new(KvStore::open_in_memory().await.unwrap());
        let query = submitted_query();
        queue.enqueue(&query).await.unwrap();

        let mut first = app_with(backend_with_defaults(ScriptedBackend::new()));
        let before = first.inquiries().len();
        assert_eq!(first.bootstrap(&queue).await.unwrap(), 1);
        assert_eq!(first.inquiries().len(), before + 1);

        let merged = first.inquiry(&query.id).unwrap();
        assert_eq!(merged.channel, Channel::ProductQuery);
        assert!(matches!(merged.customer, CustomerRef::Anonymous { .. }));
        assert_eq!(merged.messages().len(), 1);

        let customer = first
            .views()
            .into_iter()
            .find(|v| v.inquiry.id == query.id)
            .and_then(|v| v.customer.map(|c| c.into_owned()))
            .unwrap();
        assert!(customer.is_anonymous());
        assert!(customer.tags.iter().any(|t| t == "product-query"));

        let mut second = app_with(backend_with_defaults(ScriptedBackend::new()));
        let count = second.inquiries().len();
        assert_eq!(second.bootstrap(&queue).await.unwrap(), 0);
        assert_eq!(second.inquiries().len(), count);
    }

    #[tokio::test]
    async fn test_bootstrap_ranks_and_selects_nothing() {
        let backend = ScriptedBackend::new()
            .on(
                PRIORITIZE_SYSTEM,
                "Subject: Second",
                Script::reply(
                    r#"{"sentiment":"negative","urgency":"high","priorityScore":9,"reason":"x"}"#,
                ),
            )
            .on_flow(
                PRIORITIZE_SYSTEM,
                Script::reply(
                    r#"{"sentiment":"neutral","urgency":"low","priorityScore":2,"reason":"x"}"#,
                ),
            );
        let queue = PendingQueries::new(KvStore::open_in_memory().await.unwrap());
        let mut app = app_with(backend_with_defaults(backend));

        app.bootstrap(&queue).await.unwrap();
        assert_eq!(app.phase(), SessionPhase::Idle);
        assert_eq!(app.inquiries()[0].id, "inq_b");
        assert!(app.inquiries().iter().all(|i| i.priority.is_some()));
        assert!(app.inquiries().iter().all(|i| !i.loading_priority));
    }

    #[tokio::test]
    async fn test_reprioritize_reorders() {
        let backend = ScriptedBackend::new().on_flow(
            PRIORITIZE_SYSTEM,
            Script::reply(r#"{"sentiment":"negative","urgency":"high","priorityScore":10,"reason":"x"}"#),
        );
        let mut app = app_with(backend_with_defaults(backend));
        let last = app.inquiries().last().unwrap().id.clone();

        let p = app.reprioritize(&last).await.unwrap();
        assert_eq!(p.priority_score, 10.0);
        assert_eq!(app.inquiries()[0].id, last);
    }
}
