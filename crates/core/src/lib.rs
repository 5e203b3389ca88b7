//! Domain logic shared by the events and comments services.
//!
//! Everything in this crate is free of HTTP and SQL concerns: field
//! predicates, the event validation engine, the storage boundary and the
//! update controller that sits on top of it.

pub mod comment;
pub mod error;
pub mod event;
pub mod event_service;
pub mod event_store;
pub mod types;
pub mod validation;
