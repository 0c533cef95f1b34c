use std::sync::Arc;

use chrono::Duration;
use parrot_core::model::ArticleCursor;
use parrot_core::time::{fixed_clock, fixed_now};
use services::{FeedItem, IngestReport, IngestService};
use storage::repository::{ArticleRepository, Eligibility, InMemoryRepository};

fn item(guid: &str, hours_ago: i64, body: &str) -> FeedItem {
    FeedItem {
        guid: guid.to_owned(),
        title: format!("Story {guid}"),
        body: body.to_owned(),
        source: "BBC".to_owned(),
        published_at: fixed_now() - Duration::hours(hours_ago),
    }
}

#[tokio::test]
async fn ingest_stores_usable_items_once() {
    let repo = InMemoryRepository::new();
    let ingest = IngestService::new(fixed_clock(), Arc::new(repo.clone()));

    let items = vec![
        item("https://news.example/1", 2, "Stocks climbed on Monday. Oil prices fell."),
        item("https://news.example/2", 3, "Police said the attack was planned."),
        item("https://news.example/1", 2, "Stocks climbed on Monday. Oil prices fell."),
    ];
    let report = ingest.ingest(&items).await.unwrap();
    assert_eq!(
        report,
        IngestReport {
            stored: 2,
            skipped: 1
        }
    );

    let id = IngestService::article_id_for("https://news.example/1");
    let stored = repo.get_by_id(&id).await.unwrap();
    assert_eq!(
        stored.sentences(),
        &["Stocks climbed on Monday.", "Oil prices fell."]
    );

    let eligibility = Eligibility {
        published_after: fixed_now() - Duration::days(3),
        max_words: 20,
    };
    let first = repo
        .find_next_eligible(&ArticleCursor::before(fixed_now()), &eligibility)
        .await
        .unwrap();
    assert_eq!(first.id(), &id);
    assert!(
        repo.find_next_eligible(&ArticleCursor::after_article(&first), &eligibility)
            .await
            .is_err()
    );
}

#[tokio::test]
async fn purge_drops_articles_past_retention() {
    let repo = InMemoryRepository::new();
    let ingest = IngestService::new(fixed_clock(), Arc::new(repo.clone()));
    ingest
        .ingest(&[
            item("fresh", 1, "Markets opened higher."),
            item("old", 24 * 10, "Markets opened lower."),
        ])
        .await
        .unwrap();

    let removed = ingest.purge(Duration::days(7)).await.unwrap();
    assert_eq!(removed, 1);
    assert!(
        repo.get_by_id(&IngestService::article_id_for("fresh"))
            .await
            .is_ok()
    );
    assert!(
        repo.get_by_id(&IngestService::article_id_for("old"))
            .await
            .is_err()
    );
}
