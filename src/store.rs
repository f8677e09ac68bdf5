//! Per-kind window state.
//!
//! `WindowStore` owns one [`BoundedWindow`] per [`NumberKind`], each behind its own
//! `tokio::sync::Mutex`. A merge holds the lock of exactly one kind for the whole
//! snapshot/push/snapshot sequence, so merges on the same kind are applied
//! atomically and in a total order while different kinds never contend.
//!
//! The critical section never awaits anything besides the lock itself: callers
//! fetch upstream numbers first and hand the finished list to [`WindowStore::merge`].
//!
//! # Example
//! ```
//! use window_average::kind::NumberKind;
//! use window_average::store::WindowStore;
//!
//! # tokio_test::block_on(async {
//! let store = WindowStore::new(10).unwrap();
//! let snap = store.merge(NumberKind::Even, 3, vec![2, 4, 6, 8]).await.unwrap();
//! assert_eq!(snap.window_curr_state, vec![4, 6, 8]);
//! assert_eq!(snap.avg, 6.0);
//! # });
//! ```

use crate::data::window::{BoundedWindow, PushOutcome};
use crate::error::AppResult;
use crate::kind::NumberKind;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Outcome of one merge, shaped like the `/numbers/{kind}` response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSnapshot {
    /// Window contents before the merge
    pub window_prev_state: Vec<i64>,
    /// Window contents after the merge
    pub window_curr_state: Vec<i64>,
    /// Numbers received for this merge, unmodified
    pub numbers: Vec<i64>,
    /// Mean of `window_curr_state` rounded to two decimals (0 when empty)
    pub avg: f64,
}

/// Owner of every per-kind window.
#[derive(Debug)]
pub struct WindowStore {
    windows: [Mutex<BoundedWindow>; 4],
}

impl WindowStore {
    /// Create a store with an empty window per kind.
    ///
    /// `initial_capacity` only seeds the windows; every merge applies its own
    /// capacity.
    pub fn new(initial_capacity: usize) -> AppResult<Self> {
        Ok(Self {
            windows: [
                Mutex::new(BoundedWindow::new(initial_capacity)?),
                Mutex::new(BoundedWindow::new(initial_capacity)?),
                Mutex::new(BoundedWindow::new(initial_capacity)?),
                Mutex::new(BoundedWindow::new(initial_capacity)?),
            ],
        })
    }

    /// Merge `incoming` into the window for `kind` under `capacity`.
    ///
    /// Fails only with `InvalidWindowSize` when `capacity` is 0, in which case
    /// the window is left untouched.
    pub async fn merge(
        &self,
        kind: NumberKind,
        capacity: usize,
        incoming: Vec<i64>,
    ) -> AppResult<WindowSnapshot> {
        let mut window = self.windows[kind.index()].lock().await;

        let window_prev_state = window.snapshot();
        let trimmed = window.set_capacity(capacity)?;

        let mut appended = 0usize;
        let mut duplicates = 0usize;
        let mut evicted = trimmed.len();
        for &value in &incoming {
            match window.push(value) {
                PushOutcome::Duplicate => duplicates += 1,
                PushOutcome::Appended => appended += 1,
                PushOutcome::AppendedWithEviction(_) => {
                    appended += 1;
                    evicted += 1;
                }
            }
        }

        let window_curr_state = window.snapshot();
        let avg = window.average();
        drop(window);

        tracing::debug!(
            kind = %kind,
            capacity,
            received = incoming.len(),
            appended,
            duplicates,
            evicted,
            avg,
            "Merged numbers into window"
        );

        Ok(WindowSnapshot {
            window_prev_state,
            window_curr_state,
            numbers: incoming,
            avg,
        })
    }

    /// Current contents of the window for `kind`.
    pub async fn current(&self, kind: NumberKind) -> Vec<i64> {
        self.windows[kind.index()].lock().await.snapshot()
    }
}
