//! Completion system for Redis scripts
//!
//! Every request re-runs the full pipeline over the current document text.
//!
//! # Architecture
//!
//! - **Cursor**: maps (line, character) onto the owning statement
//! - **Context**: decides whether users, keys or commands are expected
//! - **Provider**: fetches completion candidates
//! - **Engine**: orchestrates the entire completion flow
//!
//! # Examples
//!
//! ```
//! use redis_lsp::completion::{
//!     CachedCandidateProvider, CompletionContext, CompletionEngine, Triggers,
//! };
//! use redis_lsp::connection::NameCache;
//! use std::sync::Arc;
//!
//! let cache = NameCache::new(vec!["default".to_string()], vec![]);
//! let provider = Arc::new(CachedCandidateProvider::new(Arc::new(cache)));
//! let engine = CompletionEngine::new(provider, Triggers::default());
//!
//! let result = engine.complete("ACL GETUSER ", 0, 12);
//! assert_eq!(result.context, CompletionContext::User);
//! assert_eq!(result.candidates, vec!["default"]);
//! ```

mod context;
mod cursor;
mod engine;
mod provider;

pub use context::{CompletionContext, Triggers};
pub use cursor::{Resolution, resolve};
pub use engine::{Completion, CompletionEngine};
pub use provider::{CachedCandidateProvider, CandidateProvider};
