// Pagination estimate for generated documents.
// Implements: per-fragment page estimator, cover/index-aware page map.
// Pure and CPU-bound; handlers call into it through spawn_blocking.

pub mod estimator;
pub mod page_map;
pub mod page_metrics;

// Re-export the public API consumed by handlers and the renderer.
pub use estimator::{estimate_pages, EstimateMode, PageEstimator};
pub use page_map::{build_page_map, content_start_page, PageMapEntry};
