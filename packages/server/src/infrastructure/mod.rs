//! Infrastructure layer: concrete registry storage and client-facing text.

pub mod dto;
pub mod repository;
