#![allow(dead_code)]

use coachmark_core::{
    Layout, MemoryBackend, Persistence, Rect, Size, StoreBuilder, SqliteBackend, TourEngine,
    TourEngineBuilder,
};
use tempfile::TempDir;

pub type MemoryEngine = TourEngine<Layout, Persistence<MemoryBackend>>;

/// A 1280x800 page with a few buttons and no dialogs open.
pub fn page() -> Layout {
    let mut layout = Layout::new(Size::new(1280.0, 800.0));
    layout
        .mount("btn-a", Rect::new(100.0, 120.0, 96.0, 36.0))
        .mount("btn-b", Rect::new(320.0, 120.0, 96.0, 36.0))
        .mount("btn-new-category", Rect::new(24.0, 200.0, 160.0, 40.0));
    layout
}

/// Helper function to create an engine over an in-memory store
pub fn create_test_engine(layout: Layout) -> MemoryEngine {
    TourEngineBuilder::new(layout, Persistence::new(MemoryBackend::new()))
        .build()
        .expect("Failed to create engine")
}

/// Helper function to create a SQLite store in a temporary directory
pub fn create_test_store() -> (TempDir, Persistence<SqliteBackend>) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let store = StoreBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .expect("Failed to create store");
    (temp_dir, store)
}
