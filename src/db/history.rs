//! Saved dialogues and memes, newest first.
//!
//! The web layer records results here after a generation; the generators
//! themselves never read or write history.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::entities::history;
use crate::constants::HISTORY_LIMIT;

/// Which history list an entry belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    /// Generated dialogues
    Dialogue,
    /// Generated meme captions
    Meme,
}

impl HistoryKind {
    /// Name used in URLs and the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dialogue => "dialogue",
            Self::Meme => "meme",
        }
    }
}

/// Not a known [`HistoryKind`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownHistoryKind(pub String);

impl std::fmt::Display for UnknownHistoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown history kind {}", self.0)
    }
}

impl std::error::Error for UnknownHistoryKind {}

impl FromStr for HistoryKind {
    type Err = UnknownHistoryKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "dialogue" => Ok(Self::Dialogue),
            "meme" => Ok(Self::Meme),
            other => Err(UnknownHistoryKind(other.to_string())),
        }
    }
}

/// A saved generation.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Store-assigned id
    pub id: i32,
    /// Which list it's in
    pub kind: HistoryKind,
    /// What the user typed
    pub description: String,
    /// The generated result, as the client sent it
    pub payload: Value,
    /// RFC 3339 timestamp
    pub created_at: String,
}

impl HistoryEntry {
    fn from_model(kind: HistoryKind, model: history::Model) -> Self {
        let payload = serde_json::from_str(&model.payload)
            .unwrap_or_else(|_| Value::String(model.payload.clone()));
        Self {
            id: model.id,
            kind,
            description: model.description,
            payload,
            created_at: model.created_at.and_utc().to_rfc3339(),
        }
    }
}

/// Persistence for the per-kind history lists.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Saves an entry, dropping the oldest beyond [`HISTORY_LIMIT`].
    async fn append(
        &self,
        kind: HistoryKind,
        description: &str,
        payload: &Value,
    ) -> Result<HistoryEntry, DbErr>;

    /// All entries of a kind, newest first.
    async fn list(&self, kind: HistoryKind) -> Result<Vec<HistoryEntry>, DbErr>;

    /// Deletes one entry. Returns false if it didn't exist.
    async fn remove(&self, kind: HistoryKind, id: i32) -> Result<bool, DbErr>;

    /// Deletes every entry of a kind, returning how many went.
    async fn clear(&self, kind: HistoryKind) -> Result<u64, DbErr>;
}

/// [`HistoryStore`] on the SQLite database.
#[derive(Clone, Debug)]
pub struct DbHistoryStore {
    db: DatabaseConnection,
}

impl DbHistoryStore {
    /// Wraps a migrated connection.
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HistoryStore for DbHistoryStore {
    async fn append(
        &self,
        kind: HistoryKind,
        description: &str,
        payload: &Value,
    ) -> Result<HistoryEntry, DbErr> {
        let payload =
            serde_json::to_string(payload).map_err(|err| DbErr::Custom(err.to_string()))?;
        let db_txn = self.db.begin().await?;

        let model = history::ActiveModel {
            kind: Set(kind.as_str().to_string()),
            description: Set(description.to_string()),
            payload: Set(payload),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&db_txn)
        .await?;

        let stale: Vec<i32> = history::Entity::find()
            .filter(history::Column::Kind.eq(kind.as_str()))
            .order_by_desc(history::Column::Id)
            .all(&db_txn)
            .await?
            .into_iter()
            .skip(usize::try_from(HISTORY_LIMIT).unwrap_or(usize::MAX))
            .map(|entry| entry.id)
            .collect();
        if !stale.is_empty() {
            debug!("Pruning {} old {} entries", stale.len(), kind.as_str());
            history::Entity::delete_many()
                .filter(history::Column::Id.is_in(stale))
                .exec(&db_txn)
                .await?;
        }
        db_txn.commit().await?;

        Ok(HistoryEntry::from_model(kind, model))
    }

    async fn list(&self, kind: HistoryKind) -> Result<Vec<HistoryEntry>, DbErr> {
        Ok(history::Entity::find()
            .filter(history::Column::Kind.eq(kind.as_str()))
            .order_by_desc(history::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|model| HistoryEntry::from_model(kind, model))
            .collect())
    }

    async fn remove(&self, kind: HistoryKind, id: i32) -> Result<bool, DbErr> {
        let result = history::Entity::delete_many()
            .filter(history::Column::Id.eq(id))
            .filter(history::Column::Kind.eq(kind.as_str()))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn clear(&self, kind: HistoryKind) -> Result<u64, DbErr> {
        let result = history::Entity::delete_many()
            .filter(history::Column::Kind.eq(kind.as_str()))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{connect_memory_db, migrations::Migrator};
    use sea_orm_migration::MigratorTrait;
    use serde_json::json;

    async fn store() -> DbHistoryStore {
        let db = connect_memory_db().await.expect("connect test db");
        Migrator::up(&db, None).await.expect("run migrations");
        DbHistoryStore::new(db)
    }

    #[test]
    fn kinds_parse() {
        assert_eq!("meme".parse::<HistoryKind>(), Ok(HistoryKind::Meme));
        assert_eq!("dialogue".parse::<HistoryKind>(), Ok(HistoryKind::Dialogue));
        assert_eq!(
            "gif".parse::<HistoryKind>(),
            Err(UnknownHistoryKind("gif".to_string()))
        );
    }

    #[tokio::test]
    async fn append_then_list_newest_first() {
        let store = store().await;
        store
            .append(HistoryKind::Meme, "first", &json!({"topText": "A"}))
            .await
            .expect("append");
        let second = store
            .append(HistoryKind::Meme, "second", &json!({"topText": "B"}))
            .await
            .expect("append");
        store
            .append(HistoryKind::Dialogue, "other list", &json!({}))
            .await
            .expect("append");

        let memes = store.list(HistoryKind::Meme).await.expect("list");
        assert_eq!(memes.len(), 2);
        assert_eq!(memes[0], second);
        assert_eq!(memes[0].payload["topText"], "B");
        assert_eq!(memes[1].description, "first");
    }

    #[tokio::test]
    async fn keeps_only_the_newest() {
        let store = store().await;
        for n in 0..(HISTORY_LIMIT + 5) {
            store
                .append(HistoryKind::Dialogue, &format!("entry {n}"), &json!(n))
                .await
                .expect("append");
        }
        let entries = store.list(HistoryKind::Dialogue).await.expect("list");
        assert_eq!(entries.len() as u64, HISTORY_LIMIT);
        assert_eq!(
            entries[0].description,
            format!("entry {}", HISTORY_LIMIT + 4)
        );
        assert_eq!(entries.last().map(|e| e.description.as_str()), Some("entry 5"));
    }

    #[tokio::test]
    async fn remove_and_clear() {
        let store = store().await;
        let meme = store
            .append(HistoryKind::Meme, "keep me?", &json!({}))
            .await
            .expect("append");
        store
            .append(HistoryKind::Meme, "another", &json!({}))
            .await
            .expect("append");
        store
            .append(HistoryKind::Dialogue, "survivor", &json!({}))
            .await
            .expect("append");

        assert!(!store.remove(HistoryKind::Dialogue, meme.id).await.expect("remove"));
        assert!(store.remove(HistoryKind::Meme, meme.id).await.expect("remove"));
        assert!(!store.remove(HistoryKind::Meme, meme.id).await.expect("remove"));

        assert_eq!(store.clear(HistoryKind::Meme).await.expect("clear"), 1);
        assert!(store.list(HistoryKind::Meme).await.expect("list").is_empty());
        assert_eq!(store.list(HistoryKind::Dialogue).await.expect("list").len(), 1);
    }
}
