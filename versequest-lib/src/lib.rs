//! Versequest - verse retrieval over versioned scripture corpora
//!
//! # Architecture
//!
//! ```text
//! Query + Edition -> CorpusStore (load once per edition)
//!                         |
//!                    Reference parser --hit--> single verse (score 1.0)
//!                         |
//!                        miss
//!                         |
//!                 EmbeddingCache (embed once, persist) -> rank -> top-k verses
//! ```
//!
//! # Example
//!
//! ```ignore
//! use versequest_lib::{config::Config, search::SearchEngine};
//!
//! let engine = Config::default().engine();
//!
//! // A citation resolves to exactly one verse
//! let hit = engine.search("John 3:16", "kjv")?;
//!
//! // Anything else is ranked by meaning
//! let results = engine.search("love your neighbor", "kjv")?;
//! ```

mod cells;
pub mod config;
pub mod corpus;
pub mod embed;
pub mod error;
pub mod reference;
pub mod search;
pub mod store;

#[cfg(test)]
mod fixtures;

pub use error::{Error, Result};
