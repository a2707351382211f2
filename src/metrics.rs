use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Domain counters for monitoring
#[derive(Clone)]
pub struct Metrics {
    pub signups: Arc<AtomicUsize>,
    pub logins_succeeded: Arc<AtomicUsize>,
    pub logins_failed: Arc<AtomicUsize>,
    pub books_created: Arc<AtomicUsize>,
    pub reviews_created: Arc<AtomicUsize>,
    pub reviews_updated: Arc<AtomicUsize>,
    pub reviews_deleted: Arc<AtomicUsize>,
    pub start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            signups: Arc::new(AtomicUsize::new(0)),
            logins_succeeded: Arc::new(AtomicUsize::new(0)),
            logins_failed: Arc::new(AtomicUsize::new(0)),
            books_created: Arc::new(AtomicUsize::new(0)),
            reviews_created: Arc::new(AtomicUsize::new(0)),
            reviews_updated: Arc::new(AtomicUsize::new(0)),
            reviews_deleted: Arc::new(AtomicUsize::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn inc_signups(&self) {
        self.signups.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_logins_succeeded(&self) {
        self.logins_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_logins_failed(&self) {
        self.logins_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_books_created(&self) {
        self.books_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_reviews_created(&self) {
        self.reviews_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_reviews_updated(&self) {
        self.reviews_updated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_reviews_deleted(&self) {
        self.reviews_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            signups: self.signups.load(Ordering::Relaxed),
            logins_succeeded: self.logins_succeeded.load(Ordering::Relaxed),
            logins_failed: self.logins_failed.load(Ordering::Relaxed),
            books_created: self.books_created.load(Ordering::Relaxed),
            reviews_created: self.reviews_created.load(Ordering::Relaxed),
            reviews_updated: self.reviews_updated.load(Ordering::Relaxed),
            reviews_deleted: self.reviews_deleted.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
pub struct MetricsSnapshot {
    pub signups: usize,
    pub logins_succeeded: usize,
    pub logins_failed: usize,
    pub books_created: usize,
    pub reviews_created: usize,
    pub reviews_updated: usize,
    pub reviews_deleted: usize,
    pub uptime_seconds: u64,
}
