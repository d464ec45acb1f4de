//! Open document texts
//!
//! Documents are synced in full: every change replaces the whole text.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tower_lsp::lsp_types::Url;

/// Text of every open document, keyed by URI
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: Arc<RwLock<HashMap<Url, String>>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or replace the text of a document
    pub async fn set(&self, uri: Url, text: String) {
        self.documents.write().await.insert(uri, text);
    }

    /// Forget a closed document
    pub async fn remove(&self, uri: &Url) {
        self.documents.write().await.remove(uri);
    }

    /// Snapshot of a document's text
    pub async fn get(&self, uri: &Url) -> Option<String> {
        self.documents.read().await.get(uri).cloned()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}
