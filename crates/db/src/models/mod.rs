pub mod comment;
pub mod event;
