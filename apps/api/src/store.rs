//! Document store. Process-lifetime, in memory, keyed by a short generated id.
//!
//! Nothing here survives a restart. Readers always receive a cloned snapshot, so a
//! page map computed from `get` cannot observe a concurrent edit half-way through.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::document::{Document, Page, PageImage};

/// Storage seam injected into handlers through `AppState`.
///
/// Page-level operations return `None` when the document or page index does not exist.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, doc: Document);

    async fn get(&self, id: &str) -> Option<Document>;

    /// Replaces the content and/or image list of one page.
    async fn update_page(
        &self,
        id: &str,
        page_index: usize,
        content: Option<String>,
        images: Option<Vec<PageImage>>,
    ) -> Option<Page>;

    async fn add_image(&self, id: &str, page_index: usize, image: PageImage) -> Option<Page>;

    /// Removes one image. An out-of-range image index leaves the page untouched.
    async fn remove_image(&self, id: &str, page_index: usize, image_index: usize)
        -> Option<Page>;
}

/// Creates an empty document with a fresh 8-character id and today's date.
pub fn new_document(title: &str, author: &str, carnet: &str, sections: Vec<String>) -> Document {
    let now = Utc::now();
    let id: String = Uuid::new_v4().to_string().chars().take(8).collect();

    Document {
        id,
        title: title.to_string(),
        author: author.to_string(),
        carnet: carnet.to_string(),
        date: now.format("%B %d, %Y").to_string(),
        sections,
        pages: Vec::new(),
        created_at: now,
        ..Document::default()
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    documents: RwLock<HashMap<String, Document>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn with_page<F>(&self, id: &str, page_index: usize, edit: F) -> Option<Page>
    where
        F: FnOnce(&mut Page) + Send,
    {
        let mut documents = self.documents.write().await;
        let page = documents.get_mut(id)?.pages.get_mut(page_index)?;
        edit(page);
        Some(page.clone())
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn insert(&self, doc: Document) {
        self.documents.write().await.insert(doc.id.clone(), doc);
    }

    async fn get(&self, id: &str) -> Option<Document> {
        self.documents.read().await.get(id).cloned()
    }

    async fn update_page(
        &self,
        id: &str,
        page_index: usize,
        content: Option<String>,
        images: Option<Vec<PageImage>>,
    ) -> Option<Page> {
        self.with_page(id, page_index, |page| {
            if let Some(content) = content {
                page.content = content;
            }
            if let Some(images) = images {
                page.images = images;
            }
        })
        .await
    }

    async fn add_image(&self, id: &str, page_index: usize, image: PageImage) -> Option<Page> {
        self.with_page(id, page_index, |page| page.images.push(image))
            .await
    }

    async fn remove_image(
        &self,
        id: &str,
        page_index: usize,
        image_index: usize,
    ) -> Option<Page> {
        self.with_page(id, page_index, |page| {
            if image_index < page.images.len() {
                page.images.remove(image_index);
            }
        })
        .await
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn image(url: &str) -> PageImage {
        PageImage {
            url: url.to_string(),
            caption: String::new(),
        }
    }

    async fn seeded_store() -> (InMemoryStore, String) {
        let store = InMemoryStore::new();
        let mut doc = new_document("Tarea", "Ana", "1234", vec!["cover".to_string()]);
        doc.pages = vec![
            Page {
                title: "Intro".to_string(),
                content: "<p>hola</p>".to_string(),
                ..Page::default()
            },
            Page::default(),
        ];
        let id = doc.id.clone();
        store.insert(doc).await;
        (store, id)
    }

    #[test]
    fn test_new_document_has_short_id_and_no_pages() {
        let doc = new_document("T", "A", "C", vec![]);
        assert_eq!(doc.id.len(), 8);
        assert!(doc.pages.is_empty());
        assert!(!doc.date.is_empty());
        assert_ne!(
            new_document("T", "A", "C", vec![]).id,
            doc.id,
            "ids should be unique"
        );
    }

    #[tokio::test]
    async fn test_get_returns_snapshot() {
        let (store, id) = seeded_store().await;
        let mut snapshot = store.get(&id).await.unwrap();
        snapshot.pages.clear();
        assert_eq!(store.get(&id).await.unwrap().pages.len(), 2);
    }

    #[tokio::test]
    async fn test_get_unknown_is_none() {
        let (store, _) = seeded_store().await;
        assert!(store.get("missing").await.is_none());
    }

    #[tokio::test]
    async fn test_update_page_content_only() {
        let (store, id) = seeded_store().await;
        store.add_image(&id, 0, image("/uploads/a.png")).await.unwrap();

        let page = store
            .update_page(&id, 0, Some("<p>nuevo</p>".to_string()), None)
            .await
            .unwrap();
        assert_eq!(page.content, "<p>nuevo</p>");
        assert_eq!(page.images.len(), 1, "images untouched");
    }

    #[tokio::test]
    async fn test_update_page_out_of_range_is_none() {
        let (store, id) = seeded_store().await;
        assert!(store.update_page(&id, 2, None, None).await.is_none());
        assert!(store.update_page("nope", 0, None, None).await.is_none());
    }

    #[tokio::test]
    async fn test_add_and_remove_images_in_order() {
        let (store, id) = seeded_store().await;
        store.add_image(&id, 1, image("a")).await.unwrap();
        store.add_image(&id, 1, image("b")).await.unwrap();
        let page = store.add_image(&id, 1, image("c")).await.unwrap();
        assert_eq!(page.images.len(), 3);

        let page = store.remove_image(&id, 1, 1).await.unwrap();
        let urls: Vec<&str> = page.images.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_remove_image_out_of_range_is_noop() {
        let (store, id) = seeded_store().await;
        store.add_image(&id, 0, image("a")).await.unwrap();
        let page = store.remove_image(&id, 0, 5).await.unwrap();
        assert_eq!(page.images.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_image_unknown_page_is_none() {
        let (store, id) = seeded_store().await;
        assert!(store.remove_image(&id, 9, 0).await.is_none());
    }
}
