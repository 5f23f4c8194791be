//! Data transfer objects: the text the server sends to clients.

pub mod notice;

pub use notice::Notice;
