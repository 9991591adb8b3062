//! Serialized access to a devnet from several threads.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::devnet::Devnet;

/// Cloneable handle; callers are admitted one at a time.
#[derive(Debug, Clone)]
pub struct SharedDevnet {
    inner: Arc<Mutex<Devnet>>,
}

impl SharedDevnet {
    pub fn new(devnet: Devnet) -> Self {
        Self {
            inner: Arc::new(Mutex::new(devnet)),
        }
    }

    /// Run `f` with exclusive access. Everything `f` does is one admission.
    pub fn with<R>(&self, f: impl FnOnce(&mut Devnet) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    pub fn lock(&self) -> MutexGuard<'_, Devnet> {
        self.inner.lock()
    }
}
