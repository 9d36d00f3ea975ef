//! # Agent Protocol
//!
//! Directory-based work item tracking with generated Markdown indexes.
//!
//! Each unit of work is a folder under `.agentprotocol/open/` holding a
//! `plan.md`, a `build.md` and optional notes in `build/`. The reindex engine
//! scans those folders, pulls titles, statuses and one-line summaries out of
//! the documents, and rewrites the tables kept between marker comments in
//! the protocol `README.md` and in each item's `build.md`.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌─────────────┐   ┌──────────────┐
//! │  open/<id>-* │──▶│  Extractor  │──▶│ Table+Splice │──▶ README.md
//! │ plan / build │   │ (text only) │   │  (markers)   │──▶ build.md
//! └──────────────┘   └─────────────┘   └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! agentproto init                       # create .agentprotocol/ with an example item
//! agentproto create "Fix login" --plan  # add a work item
//! agentproto reindex --next             # refresh indexes, with next actions
//! agentproto list                       # show open items
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`extract`] | Frontmatter and section extraction |
//! | [`markers`] | Marker regions and splicing |
//! | [`table`] | Index table rendering |
//! | [`layout`] | Protocol tree paths and listings |
//! | [`list`] | Open item listing |
//! | [`reindex`] | Index rewriting |
//! | [`report`] | Outcome reporting |
//! | [`scaffold`] | `init` / `create` |
//! | [`id`] | Identifiers and timestamps |

pub mod config;
pub mod extract;
pub mod id;
pub mod layout;
pub mod list;
pub mod markers;
pub mod models;
pub mod reindex;
pub mod report;
pub mod scaffold;
pub mod table;
