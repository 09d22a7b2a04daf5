use std::sync::Arc;

use crate::schema::{SPREADSHEET_ID_PROPERTY, WORKBOOK_TITLE};
use crate::services::Tracker;
use crate::store::{MemoryBackend, SheetBackend};

/// Tracker wired to a private in-memory backend
pub struct TestContext {
    pub tracker: Arc<Tracker>,
    pub backend: Arc<MemoryBackend>,
}

impl TestContext {
    /// Fully initialized workbook with sample logins and rows
    pub async fn bootstrapped() -> Self {
        let ctx = Self::unconfigured();
        ctx.tracker
            .initialize_spreadsheet()
            .await
            .expect("bootstrap in memory");
        ctx
    }

    /// Configured workbook that holds no sheets yet
    pub async fn with_empty_workbook() -> Self {
        let backend = Arc::new(MemoryBackend::new());
        let id = backend
            .create_workbook(WORKBOOK_TITLE)
            .await
            .expect("create workbook");
        backend
            .set_property(SPREADSHEET_ID_PROPERTY, &id)
            .await
            .expect("record workbook id");

        Self {
            tracker: Arc::new(Tracker::new(backend.clone(), Some(id))),
            backend,
        }
    }

    /// No workbook identifier anywhere; every data operation faults
    pub fn unconfigured() -> Self {
        let backend = Arc::new(MemoryBackend::new());
        Self {
            tracker: Arc::new(Tracker::new(backend.clone(), None)),
            backend,
        }
    }

    pub async fn spreadsheet_id(&self) -> String {
        self.tracker
            .spreadsheet_id()
            .await
            .expect("test context has a workbook")
    }
}
