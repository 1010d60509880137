//! Top-level pages selected by the coordinator

pub mod analysis;
pub mod chat;
pub mod upload;
