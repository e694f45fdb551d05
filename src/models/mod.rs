pub mod notice;
pub mod user;

pub use notice::{NewNotice, Notice, NoticeChanges, NoticeView, NoticeWithAuthor};
pub use user::{Credentials, User, UserId};
