use crate::media::item::MediaItem;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// FIFO queue of pending media items for one session.
///
/// Insertion order is play order. Items are never reordered or deduplicated;
/// the only removal path is `dequeue`. Safe for concurrent enqueue from
/// command handlers while the playback loop dequeues.
#[derive(Debug, Default)]
pub struct PlaybackQueue {
    items: Mutex<VecDeque<Arc<MediaItem>>>,
}

impl PlaybackQueue {
    pub fn new() -> Self {
        PlaybackQueue {
            items: Mutex::new(VecDeque::new()),
        }
    }

    /// Appends an item at the tail. Never blocks beyond the internal lock.
    pub fn enqueue(&self, item: Arc<MediaItem>) {
        self.items.lock().unwrap().push_back(item);
    }

    /// Removes and returns the head item, or `None` when empty. Never waits.
    pub fn dequeue(&self) -> Option<Arc<MediaItem>> {
        self.items.lock().unwrap().pop_front()
    }

    /// Source locator of the head item, if any.
    pub fn peek_source(&self) -> Option<String> {
        self.items
            .lock()
            .unwrap()
            .front()
            .map(|item| item.source_url().to_string())
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().unwrap().is_empty()
    }

    /// Drops all pending items. Used on session teardown; in-flight downloads
    /// for dropped items finish on their own and are discarded.
    pub fn clear(&self) {
        self.items.lock().unwrap().clear();
    }
}
