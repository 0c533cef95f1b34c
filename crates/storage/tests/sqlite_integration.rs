use chrono::Duration;
use parrot_core::model::{Article, ArticleCursor, ArticleId};
use parrot_core::time::fixed_now;
use storage::repository::{ArticleRepository, Eligibility, StorageError};
use storage::sqlite::SqliteRepository;

fn build_article(id: &str, hours_ago: i64, sentences: &[&str]) -> Article {
    Article::new(
        ArticleId::new(id),
        format!("Title {id}"),
        sentences.iter().map(|s| (*s).to_owned()).collect(),
        "Reuters",
        fixed_now() - Duration::hours(hours_ago),
    )
    .unwrap()
}

fn eligibility() -> Eligibility {
    Eligibility {
        published_after: fixed_now() - Duration::days(3),
        max_words: 20,
    }
}

async fn connect(name: &str) -> SqliteRepository {
    let repo = SqliteRepository::connect(&format!("sqlite:file:{name}?mode=memory&cache=shared"))
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_roundtrip_preserves_article() {
    let repo = connect("memdb_article_roundtrip").await;

    let article = build_article(
        "a1",
        2,
        &["Stocks rose on Monday.", "Oil was \"flat\", traders said."],
    );
    repo.upsert_article(&article).await.unwrap();

    let fetched = repo.get_by_id(&ArticleId::new("a1")).await.expect("fetch");
    assert_eq!(fetched, article);
    assert_eq!(fetched.current_index(), 0);

    let missing = repo.get_by_id(&ArticleId::new("nope")).await;
    assert!(matches!(missing, Err(StorageError::NotFound)));
}

#[tokio::test]
async fn sqlite_upsert_replaces_existing_article() {
    let repo = connect("memdb_article_upsert").await;

    repo.upsert_article(&build_article("a1", 2, &["Old text here."]))
        .await
        .unwrap();
    repo.upsert_article(&build_article("a1", 2, &["New text here.", "Second."]))
        .await
        .unwrap();

    let fetched = repo.get_by_id(&ArticleId::new("a1")).await.unwrap();
    assert_eq!(fetched.sentences().len(), 2);
    assert_eq!(fetched.current_sentence(), "New text here.");
}

#[tokio::test]
async fn sqlite_walks_eligible_articles_newest_first() {
    let repo = connect("memdb_article_walk").await;

    for article in [
        build_article("b", 1, &["One two three."]),
        build_article("a", 1, &["One two three."]),
        build_article("c", 6, &["One two three."]),
        build_article("stale", 24 * 4, &["One two three."]),
        build_article("wordy", 2, &["one two three four five six seven eight nine ten \
             eleven twelve thirteen fourteen fifteen sixteen seventeen eighteen nineteen \
             twenty twentyone"]),
    ] {
        repo.upsert_article(&article).await.unwrap();
    }

    let mut cursor = ArticleCursor::before(fixed_now());
    let mut seen = Vec::new();
    loop {
        match repo.find_next_eligible(&cursor, &eligibility()).await {
            Ok(article) => {
                seen.push(article.id().to_string());
                cursor = ArticleCursor::after_article(&article);
            }
            Err(StorageError::NotFound) => break,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(seen, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn sqlite_purges_old_articles() {
    let repo = connect("memdb_article_purge").await;

    repo.upsert_article(&build_article("fresh", 1, &["Fresh news today."]))
        .await
        .unwrap();
    repo.upsert_article(&build_article("old", 24 * 8, &["Old news here."]))
        .await
        .unwrap();

    let removed = repo
        .delete_published_before(fixed_now() - Duration::days(7))
        .await
        .unwrap();
    assert_eq!(removed, 1);
    assert!(repo.get_by_id(&ArticleId::new("fresh")).await.is_ok());
    assert!(repo.get_by_id(&ArticleId::new("old")).await.is_err());
}
