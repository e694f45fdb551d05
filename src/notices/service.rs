use chrono::Utc;
use validator::Validate;

use crate::{
    error::AppError,
    models::{NewNotice, Notice, NoticeChanges, NoticeView, UserId},
    notices::store::NoticeStore,
};

/// A mutation guarded by the ownership check.
#[derive(Debug, Clone, Copy)]
enum Mutation {
    Edit,
    Delete,
}

impl Mutation {
    fn verb(self) -> &'static str {
        match self {
            Mutation::Edit => "edit",
            Mutation::Delete => "delete",
        }
    }
}

/// Notice use cases. Anyone logged in may read and create; only the author may
/// edit or delete.
#[derive(Clone)]
pub struct NoticeService {
    store: NoticeStore,
}

impl NoticeService {
    pub fn new(store: NoticeStore) -> Self {
        Self { store }
    }

    /// All notices, newest first, each marked with whether `viewer` wrote it.
    pub async fn list(&self, viewer: UserId) -> Result<Vec<NoticeView>, AppError> {
        let rows = self.store.list_with_authors().await?;
        Ok(rows
            .into_iter()
            .map(|row| NoticeView::for_viewer(row, viewer))
            .collect())
    }

    pub async fn create(
        &self,
        author: UserId,
        title: &str,
        content: &str,
    ) -> Result<NoticeView, AppError> {
        let notice = NewNotice {
            title: title.to_owned(),
            content: content.to_owned(),
        };
        notice.validate()?;

        let id = self.store.insert(author, &notice, Utc::now()).await?;
        log::info!("user {} created notice {}", author, id);
        self.view(id, author).await
    }

    /// Applies a partial update and returns the notice as it reads afterwards.
    pub async fn update(
        &self,
        user: UserId,
        notice_id: i64,
        changes: &NoticeChanges,
    ) -> Result<NoticeView, AppError> {
        self.authorize(user, notice_id, Mutation::Edit).await?;
        changes.validate()?;

        if !self.store.update(notice_id, changes, Utc::now()).await? {
            // Deleted between the ownership check and the update.
            return Err(not_found());
        }
        log::info!("user {} edited notice {}", user, notice_id);
        self.view(notice_id, user).await
    }

    pub async fn delete(&self, user: UserId, notice_id: i64) -> Result<(), AppError> {
        self.authorize(user, notice_id, Mutation::Delete).await?;

        if !self.store.delete(notice_id).await? {
            return Err(not_found());
        }
        log::info!("user {} deleted notice {}", user, notice_id);
        Ok(())
    }

    async fn authorize(
        &self,
        user: UserId,
        notice_id: i64,
        mutation: Mutation,
    ) -> Result<Notice, AppError> {
        let notice = self.store.get(notice_id).await?.ok_or_else(not_found)?;
        if notice.author_id != user {
            log::warn!(
                "user {} tried to {} notice {} owned by {}",
                user,
                mutation.verb(),
                notice_id,
                notice.author_id
            );
            return Err(AppError::Forbidden(format!(
                "You can only {} your own notices.",
                mutation.verb()
            )));
        }
        Ok(notice)
    }

    async fn view(&self, notice_id: i64, viewer: UserId) -> Result<NoticeView, AppError> {
        let row = self
            .store
            .get_with_author(notice_id)
            .await?
            .ok_or_else(not_found)?;
        Ok(NoticeView::for_viewer(row, viewer))
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Notice not found.".into())
}
