// Document API: reading, page maps, preview, in-place edits and page images.
// Page-map and estimate work is CPU-bound and runs inside tokio::task::spawn_blocking.

pub mod handlers;
pub mod uploads;
