//! Data models for Lectern entities

pub mod author;
pub mod book;
pub mod user;
