use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    /// Display time of the fetch that produced the entry.
    pub stamp: String,
    pub text: String,
}

/// Running narration, newest entry first.
#[derive(Debug, Clone)]
pub struct EventFeed {
    entries: VecDeque<FeedEntry>,
    capacity: usize,
}

impl EventFeed {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn prepend(&mut self, stamp: impl Into<String>, text: impl Into<String>) {
        self.entries.push_front(FeedEntry {
            stamp: stamp.into(),
            text: text.into(),
        });
        while self.entries.len() > self.capacity {
            self.entries.pop_back();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeedEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&FeedEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_entry_comes_first() {
        let mut feed = EventFeed::with_capacity(10);
        feed.prepend("12:00:00", "first");
        feed.prepend("12:00:05", "second");
        let texts: Vec<&str> = feed.iter().map(|entry| entry.text.as_str()).collect();
        assert_eq!(texts, vec!["second", "first"]);
        assert_eq!(feed.latest().map(|e| e.stamp.as_str()), Some("12:00:05"));
    }

    #[test]
    fn oldest_entries_fall_off() {
        let mut feed = EventFeed::with_capacity(2);
        for n in 0..5 {
            feed.prepend("t", format!("line {n}"));
        }
        assert_eq!(feed.len(), 2);
        let texts: Vec<&str> = feed.iter().map(|entry| entry.text.as_str()).collect();
        assert_eq!(texts, vec!["line 4", "line 3"]);
    }

    #[test]
    fn zero_capacity_keeps_one_line() {
        let mut feed = EventFeed::with_capacity(0);
        feed.prepend("t", "a");
        feed.prepend("t", "b");
        assert_eq!(feed.capacity(), 1);
        assert_eq!(feed.latest().map(|e| e.text.as_str()), Some("b"));
    }
}
