use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::{NewNotice, Notice, NoticeChanges, NoticeWithAuthor, UserId},
};

const SELECT_WITH_AUTHOR: &str = "SELECT n.id, n.title, n.content, n.user_id, n.created_at, n.updated_at, u.username \
     FROM notice n JOIN user u ON u.id = n.user_id";

/// Row-level access to the `notice` table. No authorization happens here.
#[derive(Clone)]
pub struct NoticeStore {
    pool: SqlitePool,
}

impl NoticeStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        author: UserId,
        notice: &NewNotice,
        created_at: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let result = sqlx::query(
            "INSERT INTO notice (title, content, created_at, updated_at, user_id) VALUES (?, ?, ?, NULL, ?)",
        )
        .bind(&notice.title)
        .bind(&notice.content)
        .bind(created_at)
        .bind(author)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn get(&self, id: i64) -> Result<Option<Notice>, AppError> {
        let notice = sqlx::query_as::<_, Notice>(
            "SELECT id, title, content, user_id, created_at, updated_at FROM notice WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(notice)
    }

    pub async fn get_with_author(&self, id: i64) -> Result<Option<NoticeWithAuthor>, AppError> {
        let row = sqlx::query_as::<_, NoticeWithAuthor>(&format!(
            "{SELECT_WITH_AUTHOR} WHERE n.id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Every notice, newest first. Notices created in the same instant are
    /// ordered by id so the listing is stable.
    pub async fn list_with_authors(&self) -> Result<Vec<NoticeWithAuthor>, AppError> {
        let rows = sqlx::query_as::<_, NoticeWithAuthor>(&format!(
            "{SELECT_WITH_AUTHOR} ORDER BY n.created_at DESC, n.id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Applies the fields present in `changes` and stamps `updated_at`.
    /// Returns `false` when no row has this id.
    pub async fn update(
        &self,
        id: i64,
        changes: &NoticeChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE notice SET title = COALESCE(?, title), content = COALESCE(?, content), updated_at = ? \
             WHERE id = ?",
        )
        .bind(changes.title.as_deref())
        .bind(changes.content.as_deref())
        .bind(updated_at)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Returns `false` when no row has this id.
    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM notice WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::CredentialStore, db, models::Credentials};
    use chrono::Duration;

    async fn setup() -> (NoticeStore, UserId) {
        let pool = db::connect("sqlite::memory:").await.unwrap();
        let author = CredentialStore::new(pool.clone(), 4)
            .register(&Credentials {
                username: "alice".to_string(),
                password: "pw1".to_string(),
            })
            .await
            .unwrap();
        (NoticeStore::new(pool), author)
    }

    fn new_notice(title: &str, content: &str) -> NewNotice {
        NewNotice {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    #[actix_rt::test]
    async fn test_insert_and_get() {
        let (store, author) = setup().await;
        let id = store
            .insert(author, &new_notice("Hi", "Hello world"), Utc::now())
            .await
            .unwrap();

        let notice = store.get(id).await.unwrap().unwrap();
        assert_eq!(notice.title, "Hi");
        assert_eq!(notice.content, "Hello world");
        assert_eq!(notice.author_id, author);
        assert!(notice.updated_at.is_none());

        let joined = store.get_with_author(id).await.unwrap().unwrap();
        assert_eq!(joined.username, "alice");
        assert_eq!(joined.notice.id, id);
    }

    #[actix_rt::test]
    async fn test_list_is_newest_first() {
        let (store, author) = setup().await;
        let now = Utc::now();
        let older = store
            .insert(author, &new_notice("older", "a"), now - Duration::minutes(5))
            .await
            .unwrap();
        let newest = store
            .insert(author, &new_notice("newest", "b"), now)
            .await
            .unwrap();
        let middle = store
            .insert(author, &new_notice("middle", "c"), now - Duration::minutes(1))
            .await
            .unwrap();

        let ids: Vec<i64> = store
            .list_with_authors()
            .await
            .unwrap()
            .into_iter()
            .map(|row| row.notice.id)
            .collect();
        assert_eq!(ids, vec![newest, middle, older]);
    }

    #[actix_rt::test]
    async fn test_partial_update_keeps_omitted_fields() {
        let (store, author) = setup().await;
        let id = store
            .insert(author, &new_notice("Hi", "Hello world"), Utc::now())
            .await
            .unwrap();

        let changes = NoticeChanges {
            title: None,
            content: Some("Updated".to_string()),
        };
        assert!(store.update(id, &changes, Utc::now()).await.unwrap());

        let notice = store.get(id).await.unwrap().unwrap();
        assert_eq!(notice.title, "Hi");
        assert_eq!(notice.content, "Updated");
        assert!(notice.updated_at.is_some());

        assert!(!store.update(id + 100, &changes, Utc::now()).await.unwrap());
    }

    #[actix_rt::test]
    async fn test_delete_reports_missing_rows() {
        let (store, author) = setup().await;
        let id = store
            .insert(author, &new_notice("Hi", "Hello world"), Utc::now())
            .await
            .unwrap();

        assert!(store.delete(id).await.unwrap());
        assert!(!store.delete(id).await.unwrap());
        assert!(store.get(id).await.unwrap().is_none());
    }

    #[actix_rt::test]
    async fn test_author_must_exist() {
        let (store, _) = setup().await;
        let result = store
            .insert(UserId(999), &new_notice("Hi", "Hello world"), Utc::now())
            .await;
        assert!(matches!(result, Err(AppError::DatabaseError(_))));
    }
}
