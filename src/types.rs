pub mod book;
pub mod notification;
