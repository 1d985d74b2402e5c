// Copyright 2025 Sqlweave Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Pool of reusable string buffers
//!
//! Renders build query text in scratch buffers taken from this pool. A
//! buffer is cleared before it is handed out and is never shared between
//! concurrent renders: it leaves the queue on `get` and re-enters on `put`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use crossbeam::queue::ArrayQueue;

/// Default number of buffers in the pool
const DEFAULT_POOL_SIZE: usize = 64;

/// Initial capacity of freshly allocated buffers
const DEFAULT_CAPACITY: usize = 256;

/// Buffers grown past this capacity are dropped instead of pooled
const MAX_CAPACITY: usize = 64 * 1024;

static GLOBAL_POOL: OnceLock<StringPool> = OnceLock::new();

/// Get the pool shared by all renders
#[inline]
pub fn string_pool() -> &'static StringPool {
    GLOBAL_POOL.get_or_init(|| StringPool::new(DEFAULT_CAPACITY, MAX_CAPACITY))
}

/// Lock-free pool of `String` buffers
///
/// # Example
/// ```
/// use sqlweave::common::StringPool;
///
/// let pool = StringPool::new(64, 1024);
/// let mut buf = pool.get();
/// buf.push_str("SELECT 1");
/// pool.put(buf);
/// assert!(pool.get().is_empty());
/// ```
pub struct StringPool {
    pool: ArrayQueue<String>,
    default_capacity: usize,
    max_capacity: usize,
    /// Total buffers created (for statistics)
    buffers_created: AtomicUsize,
    /// Total get operations
    get_count: AtomicUsize,
}

impl StringPool {
    pub fn new(default_capacity: usize, max_capacity: usize) -> Self {
        Self::with_pool_size(default_capacity, max_capacity, DEFAULT_POOL_SIZE)
    }

    pub fn with_pool_size(default_capacity: usize, max_capacity: usize, pool_size: usize) -> Self {
        Self {
            pool: ArrayQueue::new(pool_size),
            default_capacity,
            max_capacity,
            buffers_created: AtomicUsize::new(0),
            get_count: AtomicUsize::new(0),
        }
    }

    /// Take an empty buffer, allocating when the pool is drained
    pub fn get(&self) -> String {
        self.get_count.fetch_add(1, Ordering::Relaxed);
        match self.pool.pop() {
            Some(mut buf) => {
                buf.clear();
                buf
            }
            None => {
                self.buffers_created.fetch_add(1, Ordering::Relaxed);
                String::with_capacity(self.default_capacity)
            }
        }
    }

    /// Return a buffer for reuse
    ///
    /// Oversized buffers are dropped; so are buffers arriving when the pool
    /// is full.
    pub fn put(&self, mut buf: String) {
        if buf.capacity() > self.max_capacity {
            return;
        }
        buf.clear();
        let _ = self.pool.push(buf);
    }

    /// Buffers currently idle in the pool
    pub fn available(&self) -> usize {
        self.pool.len()
    }

    /// Get pool statistics as (buffers_created, get_count)
    pub fn stats(&self) -> (usize, usize) {
        (
            self.buffers_created.load(Ordering::Relaxed),
            self.get_count.load(Ordering::Relaxed),
        )
    }
}

impl std::fmt::Debug for StringPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StringPool")
            .field("available", &self.pool.len())
            .field("default_capacity", &self.default_capacity)
            .field("max_capacity", &self.max_capacity)
            .finish()
    }
}
