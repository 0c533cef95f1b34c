use chrono::{DateTime, Utc};
use parrot_core::model::{Article, ArticleId};
use sqlx::Row;

use crate::repository::{ArticleRecord, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn millis_from_time(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

pub(crate) fn time_from_millis(field: &'static str, v: i64) -> Result<DateTime<Utc>, StorageError> {
    DateTime::<Utc>::from_timestamp_millis(v)
        .ok_or_else(|| StorageError::Serialization(format!("{field} out of range: {v}")))
}

pub(crate) fn sentences_to_json(sentences: &[String]) -> Result<String, StorageError> {
    serde_json::to_string(sentences).map_err(ser)
}

pub(crate) fn sentences_from_json(raw: &str) -> Result<Vec<String>, StorageError> {
    serde_json::from_str(raw).map_err(ser)
}

pub(crate) fn map_article_row(row: &sqlx::sqlite::SqliteRow) -> Result<Article, StorageError> {
    let max_word_count_i64: i64 = row.try_get("max_word_count").map_err(ser)?;
    let max_word_count = u32::try_from(max_word_count_i64).map_err(|_| {
        StorageError::Serialization(format!("invalid max_word_count: {max_word_count_i64}"))
    })?;

    let record = ArticleRecord {
        id: ArticleId::new(row.try_get::<String, _>("id").map_err(ser)?),
        title: row.try_get("title").map_err(ser)?,
        sentences: sentences_from_json(&row.try_get::<String, _>("sentences").map_err(ser)?)?,
        source: row.try_get("source").map_err(ser)?,
        published_at: time_from_millis(
            "published_at",
            row.try_get::<i64, _>("published_at").map_err(ser)?,
        )?,
        max_word_count,
    };

    record.into_article().map_err(ser)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parrot_core::time::fixed_now;

    #[test]
    fn times_survive_millis() {
        let at = fixed_now();
        assert_eq!(time_from_millis("t", millis_from_time(at)).unwrap(), at);
        assert!(time_from_millis("t", i64::MAX).is_err());
    }

    #[test]
    fn sentences_survive_json() {
        let sentences = vec!["He said \"hi\".".to_owned(), "Bye.".to_owned()];
        let raw = sentences_to_json(&sentences).unwrap();
        assert_eq!(sentences_from_json(&raw).unwrap(), sentences);
        assert!(sentences_from_json("not json").is_err());
    }
}
