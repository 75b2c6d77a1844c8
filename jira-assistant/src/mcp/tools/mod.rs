//! MCP tools, one module per tool
//!
//! Each tool lives in `<group>/<verb>/` with its implementation in `mod.rs`
//! and the text shown to clients in `description.md`.

pub mod confluence;
pub mod tickets;
