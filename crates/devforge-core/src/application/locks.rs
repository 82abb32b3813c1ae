//! Serializes renders that target the same output root.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::application::ApplicationError;
use crate::application::paths::absolute_normalized;
use crate::error::ForgeResult;

/// Registry of one mutex per output root.
///
/// Keys are absolute, lexically normalized paths, so `./app` and
/// `out/../app` contend for the same lock. Clones share the registry.
#[derive(Debug, Clone, Default)]
pub struct OutputLocks {
    roots: Arc<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>>,
}

impl OutputLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock for `root`. Hold the returned handle and call
    /// [`OutputLock::acquire`] to serialize against other renders.
    pub fn handle(&self, root: &Path) -> ForgeResult<OutputLock> {
        let key = absolute_normalized(root)?;
        let mut roots = self
            .roots
            .lock()
            .map_err(|_| ApplicationError::LockPoisoned { path: key.clone() })?;

        // Only the registry holds unused entries.
        roots.retain(|_, lock| Arc::strong_count(lock) > 1);

        let lock = Arc::clone(roots.entry(key.clone()).or_default());
        Ok(OutputLock { path: key, lock })
    }

    /// Number of roots currently tracked.
    pub fn tracked(&self) -> usize {
        self.roots.lock().map_or(0, |roots| roots.len())
    }
}

/// Handle on one output root's mutex.
#[derive(Debug)]
pub struct OutputLock {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl OutputLock {
    /// Block until no other render holds this root.
    pub fn acquire(&self) -> ForgeResult<MutexGuard<'_, ()>> {
        debug!(root = %self.path.display(), "waiting for output lock");
        self.lock.lock().map_err(|_| {
            ApplicationError::LockPoisoned {
                path: self.path.clone(),
            }
            .into()
        })
    }

    /// Normalized output root this handle guards.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    use super::*;

    #[test]
    fn equivalent_paths_share_a_lock() {
        let locks = OutputLocks::new();
        let a = locks.handle(Path::new("out/app")).unwrap();
        let b = locks.handle(Path::new("./out/tmp/../app")).unwrap();
        assert_eq!(a.path(), b.path());
        assert!(Arc::ptr_eq(&a.lock, &b.lock));
    }

    #[test]
    fn different_paths_get_different_locks() {
        let locks = OutputLocks::new();
        let a = locks.handle(Path::new("one")).unwrap();
        let b = locks.handle(Path::new("two")).unwrap();
        assert!(!Arc::ptr_eq(&a.lock, &b.lock));
        let _ga = a.acquire().unwrap();
        let _gb = b.acquire().unwrap();
    }

    #[test]
    fn unused_entries_are_dropped() {
        let locks = OutputLocks::new();
        drop(locks.handle(Path::new("a")).unwrap());
        drop(locks.handle(Path::new("b")).unwrap());
        let _keep = locks.handle(Path::new("c")).unwrap();
        assert_eq!(locks.tracked(), 1);
    }

    #[test]
    fn holders_of_the_same_root_never_overlap() {
        let locks = OutputLocks::new();
        let inside = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let locks = locks.clone();
                let inside = Arc::clone(&inside);
                let max_seen = Arc::clone(&max_seen);
                thread::spawn(move || {
                    let handle = locks.handle(Path::new("shared-root")).unwrap();
                    let _guard = handle.acquire().unwrap();
                    let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                    max_seen.fetch_max(now, Ordering::SeqCst);
                    thread::sleep(Duration::from_millis(10));
                    inside.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();

        for worker in workers {
            worker.join().unwrap();
        }
        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }
}
