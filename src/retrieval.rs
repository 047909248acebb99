//! Keyword retrieval over an in-memory document vault

use crate::pipeline::Retriever;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A document stored in the vault
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Stable identifier
    pub id: String,

    /// Human-readable title, also searched
    pub title: String,

    /// Passage text returned as retrieval context
    pub content: String,
}

impl Document {
    /// Create a document
    pub fn new(id: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
        }
    }

    /// Whether any query term occurs in the title or content (case-insensitive)
    fn matches(&self, terms: &[String]) -> bool {
        let title = self.title.to_lowercase();
        let content = self.content.to_lowercase();
        terms
            .iter()
            .any(|term| content.contains(term.as_str()) || title.contains(term.as_str()))
    }
}

/// In-memory corpus searched by substring keyword match
///
/// A query is lowercased and split on non-word characters. A document is
/// returned when any resulting term appears in its title or content.
/// Results keep corpus order. Empty terms are ignored, so a query made only
/// of punctuation or whitespace retrieves nothing.
#[derive(Debug, Clone, Default)]
pub struct DocumentVault {
    documents: Vec<Document>,
}

impl DocumentVault {
    /// Create a vault over the given documents
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Append a document to the corpus
    pub fn add(&mut self, document: Document) {
        self.documents.push(document);
    }

    /// All documents, in corpus order
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Number of documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the vault holds no documents
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Documents matching the query, in corpus order
    pub fn search(&self, query: &str) -> Vec<&Document> {
        let terms = tokenize(query);
        if terms.is_empty() {
            return Vec::new();
        }
        self.documents.iter().filter(|doc| doc.matches(&terms)).collect()
    }
}

#[async_trait]
impl Retriever for DocumentVault {
    async fn retrieve(&self, query: &str) -> Vec<String> {
        let context: Vec<String> = self
            .search(query)
            .into_iter()
            .map(|doc| doc.content.clone())
            .collect();
        debug!("Retrieved {} passages", context.len());
        context
    }
}

/// Lowercased word terms; word characters are alphanumerics and `_`
fn tokenize(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vault() -> DocumentVault {
        DocumentVault::new(vec![
            Document::new("1", "Cache Strategy", "LRU eviction keeps frequently used context."),
            Document::new("2", "System Architecture", "Keys hash the query and retrieved context."),
            Document::new("3", "Retrieval Quality", "Measured by faithfulness and relevance."),
        ])
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("What is LRU?"), vec!["what", "is", "lru"]);
        assert_eq!(tokenize("snake_case, kebab-case"), vec!["snake_case", "kebab", "case"]);
        assert!(tokenize("  ?! ").is_empty());
    }

    #[test]
    fn test_search_matches_content_and_title() {
        let vault = vault();

        let hits = vault.search("lru");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "1");

        let hits = vault.search("ARCHITECTURE");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "2");
    }

    #[test]
    fn test_search_keeps_corpus_order() {
        let vault = vault();
        let hits = vault.search("relevance context");
        let ids: Vec<&str> = hits.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_punctuation_only_query_matches_nothing() {
        assert!(vault().search("???").is_empty());
        assert!(vault().search("").is_empty());
    }

    #[tokio::test]
    async fn test_retrieve_returns_contents() {
        let context = vault().retrieve("faithfulness").await;
        assert_eq!(context, vec!["Measured by faithfulness and relevance.".to_string()]);
    }

    #[tokio::test]
    async fn test_retrieve_no_match_is_empty() {
        assert!(vault().retrieve("zebra").await.is_empty());
    }
}
