use chrono::{DateTime, Utc};
use parrot_core::model::{Article, ArticleCursor, ArticleId};

use super::SqliteRepository;
use super::mapping::{map_article_row, millis_from_time, sentences_to_json};
use crate::repository::{ArticleRecord, ArticleRepository, Eligibility, StorageError};

#[async_trait::async_trait]
impl ArticleRepository for SqliteRepository {
    async fn find_next_eligible(
        &self,
        cursor: &ArticleCursor,
        eligibility: &Eligibility,
    ) -> Result<Article, StorageError> {
        let cursor_id = cursor.id.as_ref().map(|id| id.as_str().to_owned());

        let row = sqlx::query(
            r"
            SELECT id, title, source, sentences, max_word_count, published_at
            FROM articles
            WHERE published_at >= ?1
              AND max_word_count <= ?2
              AND (
                    published_at < ?3
                 OR (?4 IS NOT NULL AND published_at = ?3 AND id > ?4)
              )
            ORDER BY published_at DESC, id ASC
            LIMIT 1
            ",
        )
        .bind(millis_from_time(eligibility.published_after))
        .bind(i64::from(eligibility.max_words))
        .bind(millis_from_time(cursor.published_at))
        .bind(cursor_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => map_article_row(&row),
            None => Err(StorageError::NotFound),
        }
    }

    async fn get_by_id(&self, id: &ArticleId) -> Result<Article, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, title, source, sentences, max_word_count, published_at
            FROM articles WHERE id = ?1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => map_article_row(&row),
            None => Err(StorageError::NotFound),
        }
    }

    async fn upsert_article(&self, article: &Article) -> Result<(), StorageError> {
        let record = ArticleRecord::from_article(article);
        let sentences = sentences_to_json(&record.sentences)?;

        sqlx::query(
            r"
            INSERT INTO articles (id, title, source, sentences, max_word_count, published_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                source = excluded.source,
                sentences = excluded.sentences,
                max_word_count = excluded.max_word_count,
                published_at = excluded.published_at
            ",
        )
        .bind(record.id.as_str())
        .bind(record.title)
        .bind(record.source)
        .bind(sentences)
        .bind(i64::from(record.max_word_count))
        .bind(millis_from_time(record.published_at))
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn delete_published_before(&self, cutoff: DateTime<Utc>) -> Result<u64, StorageError> {
        let res = sqlx::query("DELETE FROM articles WHERE published_at < ?1")
            .bind(millis_from_time(cutoff))
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(res.rows_affected())
    }
}
