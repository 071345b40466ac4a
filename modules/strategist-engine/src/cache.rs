//! Bounded in-memory cache of scrape results keyed by URL.
//!
//! Least-recently-used eviction at capacity, plus a time-to-live after which
//! an entry is treated as absent. Only successful scrapes are stored.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub struct ScrapeCache {
    capacity: usize,
    ttl: Duration,
    inner: Mutex<Inner>,
}

struct Inner {
    entries: HashMap<String, Entry>,
    /// Front is least recently used.
    order: VecDeque<String>,
}

struct Entry {
    headlines: Vec<String>,
    stored_at: Instant,
}

impl ScrapeCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity,
            ttl,
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }

    pub fn get(&self, url: &str) -> Option<Vec<String>> {
        self.get_at(url, Instant::now())
    }

    pub fn insert(&self, url: &str, headlines: Vec<String>) {
        self.insert_at(url, headlines, Instant::now())
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn get_at(&self, url: &str, now: Instant) -> Option<Vec<String>> {
        let mut inner = self.lock();
        let expired = match inner.entries.get(url) {
            None => return None,
            Some(entry) => now.saturating_duration_since(entry.stored_at) >= self.ttl,
        };
        if expired {
            inner.entries.remove(url);
            inner.order.retain(|k| k != url);
            return None;
        }
        inner.touch(url);
        inner.entries.get(url).map(|e| e.headlines.clone())
    }

    pub(crate) fn insert_at(&self, url: &str, headlines: Vec<String>, now: Instant) {
        if self.capacity == 0 {
            return;
        }
        let mut inner = self.lock();
        if inner.entries.contains_key(url) {
            inner.touch(url);
        } else {
            while inner.entries.len() >= self.capacity {
                let Some(oldest) = inner.order.pop_front() else {
                    break;
                };
                inner.entries.remove(&oldest);
            }
            inner.order.push_back(url.to_string());
        }
        inner.entries.insert(
            url.to_string(),
            Entry {
                headlines,
                stored_at: now,
            },
        );
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Entries are plain data, so a poisoned lock is still usable.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Inner {
    fn touch(&mut self, url: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == url) {
            if let Some(key) = self.order.remove(pos) {
                self.order.push_back(key);
            }
        }
    }
}
