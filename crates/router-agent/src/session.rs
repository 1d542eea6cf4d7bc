//! Session Manager (§4.5): maps a session id to a persistent `Agent`.
//!
//! Many concurrent reads (`get_or_create` on an existing id) proceed without
//! contention via a `RwLock`; create/delete take the write lock briefly.
//! Two concurrent requests against the *same* session serialize through that
//! session's own `tokio::sync::Mutex<Agent>` -- different sessions never
//! block each other.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::agent::Agent;

pub type SharedAgent = Arc<Mutex<Agent>>;

pub struct SessionManager {
    sessions: RwLock<HashMap<String, SharedAgent>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Return the existing session's agent, or construct one via `factory`
    /// and register it under `id`.
    pub async fn get_or_create<F>(&self, id: &str, factory: F) -> SharedAgent
    where
        F: FnOnce() -> Agent,
    {
        if let Some(agent) = self.sessions.read().await.get(id) {
            return Arc::clone(agent);
        }

        let mut sessions = self.sessions.write().await;
        // Re-check: another caller may have created it while we waited for
        // the write lock.
        if let Some(agent) = sessions.get(id) {
            return Arc::clone(agent);
        }

        tracing::info!(session_id = %id, "created new agent session");
        let agent = Arc::new(Mutex::new(factory()));
        sessions.insert(id.to_string(), Arc::clone(&agent));
        agent
    }

    /// Reset the session's history, then drop it from the map. Returns
    /// `false` if the session didn't exist.
    pub async fn delete(&self, id: &str) -> bool {
        let agent = {
            let mut sessions = self.sessions.write().await;
            sessions.remove(id)
        };

        match agent {
            Some(agent) => {
                agent.lock().await.reset_history();
                tracing::info!(session_id = %id, "deleted session");
                true
            }
            None => false,
        }
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn ids(&self) -> Vec<String> {
        self.sessions.read().await.keys().cloned().collect()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmClient, LlmClientConfig};

    fn new_agent() -> Agent {
        let llm = LlmClient::new(LlmClientConfig::new("http://127.0.0.1:1", "llama3.1")).unwrap();
        Agent::new(llm, "llama3.1".to_string(), Vec::new())
    }

    #[tokio::test]
    async fn get_or_create_reuses_existing_session() {
        let manager = SessionManager::new();
        let mut factory_calls = 0;

        let first = manager
            .get_or_create("s1", || {
                factory_calls += 1;
                new_agent()
            })
            .await;
        let second = manager.get_or_create("s1", new_agent).await;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(factory_calls, 1);
        assert_eq!(manager.count().await, 1);
    }

    #[tokio::test]
    async fn different_sessions_are_independent() {
        let manager = SessionManager::new();
        manager.get_or_create("a", new_agent).await;
        manager.get_or_create("b", new_agent).await;

        assert_eq!(manager.count().await, 2);
        let mut ids = manager.ids().await;
        ids.sort();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn delete_removes_session_and_is_idempotent() {
        let manager = SessionManager::new();
        manager.get_or_create("s1", new_agent).await;

        assert!(manager.delete("s1").await);
        assert_eq!(manager.count().await, 0);
        assert!(!manager.delete("s1").await);
    }
}
