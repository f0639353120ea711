pub mod cache;
pub mod format;
pub mod transportapi;
pub mod types;
