//! Notices: persistence and the ownership rules around it.

pub mod service;
pub mod store;

pub use service::NoticeService;
pub use store::NoticeStore;
