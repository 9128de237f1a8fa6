//! MCP (Model Context Protocol) plumbing shared by both server variants
//!
//! A variant supplies a [`dispatch::Toolset`]; listing, argument checking and
//! error framing are common. Tool handlers live under [`tools`].

pub mod dispatch;
pub mod registry;
mod server;
pub mod tools;

pub use server::{run_server, ImageMcpServer};
