use std::sync::{Mutex, MutexGuard};

use tracing::warn;

/// Lock a backend mutex, recovering the guard if a previous holder panicked.
///
/// The guarded state is a connection handle or a request log; neither is left
/// half-updated by a panic, so continuing is safe.
pub(crate) fn mutex_lock<'a, T>(lock: &'a Mutex<T>, target: &'static str, op: &'static str) -> MutexGuard<'a, T> {
    match lock.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!(
                op,
                target_module = target,
                lock_kind = "mutex.lock",
                result = "poisoned_recovered",
                "Recovered from poisoned backend lock"
            );
            poisoned.into_inner()
        }
    }
}
