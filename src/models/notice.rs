use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::user::UserId;

/// A notice as stored in the `notice` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Notice {
    pub id: i64,
    pub title: String,
    pub content: String,
    /// The author. Only this user may edit or delete the notice.
    #[sqlx(rename = "user_id")]
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
    /// `None` until the first edit.
    pub updated_at: Option<DateTime<Utc>>,
}

/// A notice joined with its author's username.
#[derive(Debug, Clone, FromRow)]
pub struct NoticeWithAuthor {
    #[sqlx(flatten)]
    pub notice: Notice,
    pub username: String,
}

/// The JSON shape of a notice as seen by a particular logged-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoticeView {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub username: String,
    pub is_owner: bool,
}

impl NoticeView {
    pub fn for_viewer(row: NoticeWithAuthor, viewer: UserId) -> Self {
        let NoticeWithAuthor { notice, username } = row;
        Self {
            is_owner: notice.author_id == viewer,
            id: notice.id,
            title: notice.title,
            content: notice.content,
            created_at: notice.created_at,
            updated_at: notice.updated_at,
            username,
        }
    }
}

/// Title and content of a notice about to be created.
#[derive(Debug, Validate)]
pub struct NewNotice {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Title and content are required. Titles are limited to 100 characters."
    ))]
    pub title: String,
    #[validate(length(min = 1, message = "Title and content are required."))]
    pub content: String,
}

/// Partial update sent to `PUT /edit-notice/{id}`. Omitted fields keep their value.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct NoticeChanges {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Title must not be empty and is limited to 100 characters."
    ))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Content must not be empty."))]
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(author: i64) -> NoticeWithAuthor {
        NoticeWithAuthor {
            notice: Notice {
                id: 1,
                title: "Hi".to_string(),
                content: "Hello world".to_string(),
                author_id: UserId(author),
                created_at: Utc::now(),
                updated_at: None,
            },
            username: "alice".to_string(),
        }
    }

    #[test]
    fn test_view_marks_owner() {
        assert!(NoticeView::for_viewer(sample(1), UserId(1)).is_owner);
        assert!(!NoticeView::for_viewer(sample(1), UserId(2)).is_owner);
    }

    #[test]
    fn test_view_serializes_expected_fields() {
        let view = NoticeView::for_viewer(sample(1), UserId(1));
        let json = serde_json::to_value(&view).unwrap();
        for field in [
            "id",
            "title",
            "content",
            "created_at",
            "updated_at",
            "username",
            "is_owner",
        ] {
            assert!(json.get(field).is_some(), "missing field {field}");
        }
        assert!(json["updated_at"].is_null());
        assert_eq!(json["username"], "alice");
    }

    #[test]
    fn test_new_notice_validation() {
        let valid = NewNotice {
            title: "Hi".to_string(),
            content: "Hello world".to_string(),
        };
        assert!(valid.validate().is_ok());

        let empty_title = NewNotice {
            title: "".to_string(),
            content: "Hello world".to_string(),
        };
        assert!(empty_title.validate().is_err());

        let empty_content = NewNotice {
            title: "Hi".to_string(),
            content: "".to_string(),
        };
        assert!(empty_content.validate().is_err());

        let long_title = NewNotice {
            title: "a".repeat(101),
            content: "Hello world".to_string(),
        };
        assert!(long_title.validate().is_err());
    }

    #[test]
    fn test_notice_changes_validation() {
        assert!(NoticeChanges::default().validate().is_ok());

        let content_only = NoticeChanges {
            title: None,
            content: Some("Updated".to_string()),
        };
        assert!(content_only.validate().is_ok());

        let blank_title = NoticeChanges {
            title: Some("".to_string()),
            content: None,
        };
        assert!(blank_title.validate().is_err());
    }
}
