//! # Profile Index
//!
//! A semantic index for pooled data-quality profiles.
//!
//! Profile Index ingests nested "data-quality profile" JSON documents,
//! extracts a bounded set of high-signal fields, renders a fixed-template
//! summary, and upserts the result into a Chroma vector collection keyed by
//! profile id. A canonical-JSON content hash makes re-ingestion of unchanged
//! profiles a no-op.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌───────────────────┐   ┌───────────┐
//! │ Raw profile │──▶│ Extract+Summarize │──▶│  Chroma    │
//! │   (JSON)    │   │   Hash+Embed      │   │ collection │
//! └─────────────┘   └───────────────────┘   └────┬──────┘
//!                                                │
//!                            ┌───────────────────┤
//!                            ▼                   ▼
//!                       ┌──────────┐       ┌──────────┐
//!                       │   CLI    │       │   HTTP   │
//!                       │  (pfx)   │       │  (axum)  │
//!                       └──────────┘       └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! pfx ingest ./profiles/           # upsert every *.json under a directory
//! pfx get <profile-id>             # inspect a stored record
//! pfx serve                        # start the HTTP ingestion server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`hash`] | Canonical-JSON content hashing |
//! | [`fields`] | Field extraction from raw profiles |
//! | [`summary`] | Fixed-template summary rendering |
//! | [`ingest`] | Upsert orchestration (skip/update/insert) |
//! | [`embedding`] | Embedding provider abstraction |
//! | [`store`] | Vector store abstraction (Chroma, in-memory) |
//! | [`server`] | Ingestion HTTP server |

pub mod config;
pub mod embedding;
pub mod fields;
pub mod hash;
pub mod ingest;
pub mod models;
pub mod server;
pub mod store;
pub mod summary;
