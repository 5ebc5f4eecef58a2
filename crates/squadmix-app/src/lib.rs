// Library root: re-exports all modules so integration tests and the binary
// can access the crate's public API.

pub mod app;
pub mod config;
pub mod db;
pub mod export;
pub mod franchises;
pub mod render;
