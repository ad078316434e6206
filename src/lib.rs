//! ARCEP Fixed-Line Eligibility Library
//!
//! Resolves a street address and town name into the fixed-line broadband
//! eligibilities published by the ARCEP open-data API, and exposes that
//! lookup as a single tool over MCP stdio or HTTP.
//!
//! # Modules
//!
//! - `config`: Configuration management.
//! - `directory_client`: ARCEP API client and the `DirectoryApi` seam.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `mcp_server`: JSON-RPC stdio server.
//! - `models`: Directory records and tool arguments.
//! - `resolution`: Town → address → building → eligibility pipeline.
//! - `tool`: Tool definition and result envelope.

pub mod config;
pub mod directory_client;
pub mod errors;
pub mod handlers;
pub mod mcp_server;
pub mod models;
pub mod resolution;
pub mod tool;
