//! The Tool Registry: a name -> tool map seeded at process start and queried
//! per request.
//!
//! Backed by [`DashMap`], which gives lock-free concurrent reads and
//! fine-grained write locking, so the registry is safe to share across tasks
//! without a global `RwLock`. Initialization is lazy-once: the first caller
//! that needs a tool triggers registration of the built-ins, guarded by an
//! async mutex so concurrent first-callers don't race each other into
//! registering twice.
//!
//! # Example
//!
//! ```rust
//! # use router_kernel::registry::ToolRegistry;
//! let registry = ToolRegistry::new();
//! assert_eq!(registry.count(), 0);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex as AsyncMutex;

use crate::error::{KernelError, Result};
use crate::tool::Tool;

/// Concurrent tool registry backed by [`DashMap`].
///
/// Cheaply cloneable (`Arc`-backed) and `Send + Sync`.
#[derive(Clone)]
pub struct ToolRegistry {
    inner: Arc<DashMap<String, Arc<dyn Tool>>>,
    initialized: Arc<AtomicBool>,
    init_lock: Arc<AsyncMutex<()>>,
}

impl ToolRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            initialized: Arc::new(AtomicBool::new(false)),
            init_lock: Arc::new(AsyncMutex::new(())),
        }
    }

    /// Register a tool under its own name. Idempotent: re-registering under
    /// the same name replaces the previous entry.
    pub fn register(&self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        tracing::info!(tool = %name, "tool registered");
        self.inner.insert(name, tool);
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Result<Arc<dyn Tool>> {
        self.inner
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| KernelError::ToolNotFound {
                name: name.to_string(),
            })
    }

    /// Names of every registered tool.
    pub fn list(&self) -> Vec<String> {
        self.inner.iter().map(|e| e.key().clone()).collect()
    }

    pub fn count(&self) -> usize {
        self.inner.len()
    }

    /// Run every tool's own `health_check` and report the outcome by name.
    pub async fn health_check_all(&self) -> Vec<(String, bool)> {
        let tools: Vec<(String, Arc<dyn Tool>)> = self
            .inner
            .iter()
            .map(|e| (e.key().clone(), Arc::clone(e.value())))
            .collect();

        let mut results = Vec::with_capacity(tools.len());
        for (name, tool) in tools {
            let healthy = tool.health_check().await;
            tracing::debug!(tool = %name, healthy, "tool health check");
            results.push((name, healthy));
        }
        results
    }

    /// Ensure the registry has been initialized, running `init` at most once
    /// across all callers. A failed attempt leaves the registry empty and is
    /// retried on the next call -- but only once per call, to avoid a tight
    /// retry loop inside a single request (§4.1).
    pub async fn ensure_initialized<F, Fut>(&self, init: F) -> Result<()>
    where
        F: FnOnce(ToolRegistry) -> Fut,
        Fut: std::future::Future<Output = Result<()>>,
    {
        if self.initialized.load(Ordering::Acquire) {
            return Ok(());
        }

        let _guard = self.init_lock.lock().await;
        // Re-check under the lock: another caller may have finished while we
        // were waiting for it.
        if self.initialized.load(Ordering::Acquire) {
            return Ok(());
        }

        match init(self.clone()).await {
            Ok(()) => {
                self.initialized.store(true, Ordering::Release);
                tracing::info!(tools = self.count(), "tool registry initialized");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "tool registry initialization failed, will retry on next call");
                Err(err)
            }
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
