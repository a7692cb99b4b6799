use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const DEFAULT_RECENT_CAPACITY: usize = 10;

/// 最近開啟的容器目錄。 / Bounded history of container directories, most recent first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentContainers {
    #[serde(default = "default_capacity")]
    capacity: usize,
    #[serde(default)]
    entries: VecDeque<PathBuf>,
}

fn default_capacity() -> usize {
    DEFAULT_RECENT_CAPACITY
}

impl Default for RecentContainers {
    fn default() -> Self {
        Self::new(DEFAULT_RECENT_CAPACITY)
    }
}

impl RecentContainers {
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity == 0 {
            DEFAULT_RECENT_CAPACITY
        } else {
            capacity
        };
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 調整容量並修剪最舊的紀錄。 / Changes the capacity, dropping the oldest entries.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = if capacity == 0 {
            DEFAULT_RECENT_CAPACITY
        } else {
            capacity
        };
        self.entries.truncate(self.capacity);
    }

    /// 將目錄提升到最前面。 / Inserts `dir` at the front, removing an older copy of it.
    pub fn touch(&mut self, dir: impl Into<PathBuf>) {
        let dir = dir.into();
        self.entries.retain(|existing| existing != &dir);
        self.entries.push_front(dir);
        self.entries.truncate(self.capacity);
    }

    pub fn forget(&mut self, dir: &Path) -> bool {
        let before = self.entries.len();
        self.entries.retain(|existing| existing.as_path() != dir);
        before != self.entries.len()
    }

    /// Drops directories that no longer hold a manifest file named `marker`.
    pub fn prune_missing(&mut self, marker: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|dir| dir.join(marker).is_file());
        before - self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.entries.iter()
    }

    pub fn first(&self) -> Option<&Path> {
        self.entries.front().map(PathBuf::as_path)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn sanitize(&mut self) {
        if self.capacity == 0 {
            self.capacity = DEFAULT_RECENT_CAPACITY;
        }
        let mut seen = Vec::with_capacity(self.entries.len());
        self.entries.retain(|dir| {
            if dir.as_os_str().is_empty() || seen.contains(dir) {
                false
            } else {
                seen.push(dir.clone());
                true
            }
        });
        self.entries.truncate(self.capacity);
    }
}
