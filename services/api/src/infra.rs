use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use comiss::assessments::{
    assembler, Assessment, AssessmentDraft, AssessmentId, AssessmentRepository, StorageError,
};
use comiss::contact::{ContactNotification, NotificationError, NotificationPublisher};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// In-memory record store standing in for the hosted database. Assigns
/// sequential ids and timestamps at insert, keeps records write-once.
#[derive(Default)]
pub(crate) struct InMemoryAssessmentRepository {
    sequence: AtomicU64,
    records: Mutex<Vec<Assessment>>,
}

impl AssessmentRepository for InMemoryAssessmentRepository {
    fn insert(
        &self,
        draft: AssessmentDraft,
        user_id: Option<String>,
    ) -> Result<Assessment, StorageError> {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let meta = assembler::StoredMeta {
            id: AssessmentId(format!("asmt-{:06}", sequence + 1)),
            created_at: Utc::now(),
        };
        let record = assembler::assemble(draft, meta, user_id);
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .push(record.clone());
        Ok(record)
    }

    fn list(&self) -> Result<Vec<Assessment>, StorageError> {
        let records = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<Assessment> = records.clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    fn fetch(&self, id: &AssessmentId) -> Result<Option<Assessment>, StorageError> {
        let records = self.records.lock().expect("repository mutex poisoned");
        Ok(records.iter().find(|record| &record.id == id).cloned())
    }
}

/// Captures contact notifications instead of calling an email provider.
#[derive(Default)]
pub(crate) struct InMemoryNotificationPublisher {
    events: Mutex<Vec<ContactNotification>>,
}

impl NotificationPublisher for InMemoryNotificationPublisher {
    fn publish(&self, notification: ContactNotification) -> Result<(), NotificationError> {
        let mut guard = self.events.lock().expect("notification mutex poisoned");
        guard.push(notification);
        Ok(())
    }
}

impl InMemoryNotificationPublisher {
    #[allow(dead_code)]
    pub(crate) fn events(&self) -> Vec<ContactNotification> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .clone()
    }
}
