//! Session Management
//!
//! In-memory store mapping a session key to its dialogue. Sessions live only
//! as long as the process (or until they expire or are destroyed).
//!
//! Each session's dialogue sits behind its own mutex so messages for one key
//! are applied one at a time; different keys never contend beyond the brief
//! map lookup.

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

use ywait_agent::{DialogueSession, IntentClassifier, ResponseSynthesizer, SessionSnapshot};
use ywait_config::DialogueConfig;
use ywait_core::{BotReply, DialogueStage, Error, Message};

use crate::ServerError;

/// A stored session
pub struct Session {
    /// Session key
    pub key: String,
    dialogue: Mutex<DialogueSession>,
    /// Creation time
    pub created_at: Instant,
    last_activity: RwLock<Instant>,
}

impl Session {
    fn new(key: &str, classifier: Arc<IntentClassifier>, seed: Option<u64>) -> Self {
        Self {
            key: key.to_string(),
            dialogue: Mutex::new(DialogueSession::new(
                key,
                classifier,
                ResponseSynthesizer::new(seed),
            )),
            created_at: Instant::now(),
            last_activity: RwLock::new(Instant::now()),
        }
    }

    /// Update last activity
    pub fn touch(&self) {
        *self.last_activity.write() = Instant::now();
    }

    /// Check if session is expired
    pub fn is_expired(&self, timeout: Duration) -> bool {
        self.last_activity.read().elapsed() > timeout
    }

    /// Submit one message; the dialogue lock is held for the whole turn
    pub fn submit(&self, text: &str) -> Result<(BotReply, DialogueStage), Error> {
        let mut dialogue = self.dialogue.lock();
        let reply = dialogue.submit(text)?;
        self.touch();
        Ok((reply, dialogue.stage()))
    }

    pub fn greet(&self, user_name: &str, brand: &str) -> BotReply {
        let reply = self.dialogue.lock().greet(user_name, brand);
        self.touch();
        reply
    }

    pub fn reset(&self) {
        self.dialogue.lock().reset();
        self.touch();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.dialogue.lock().snapshot()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.dialogue.lock().messages().to_vec()
    }
}

/// Session manager
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
    classifier: Arc<IntentClassifier>,
    max_sessions: usize,
    session_timeout: Duration,
    cleanup_interval: Duration,
    rng_seed: Option<u64>,
}

impl SessionManager {
    /// Create a new session manager with default limits
    pub fn new(max_sessions: usize) -> Self {
        let defaults = DialogueConfig::default();
        Self::with_config(&DialogueConfig {
            max_sessions,
            ..defaults
        })
    }

    /// Create a session manager from dialogue settings
    pub fn with_config(config: &DialogueConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            classifier: Arc::new(IntentClassifier::new()),
            max_sessions: config.max_sessions,
            session_timeout: config.session_timeout(),
            cleanup_interval: config.cleanup_interval(),
            rng_seed: config.rng_seed,
        }
    }

    /// Start a background task that periodically removes expired sessions.
    ///
    /// Send `true` on the returned channel to stop it.
    pub fn start_cleanup_task(self: &Arc<Self>) -> watch::Sender<bool> {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let manager = Arc::clone(self);
        let interval = manager.cleanup_interval;

        tokio::spawn(async move {
            let mut interval_timer = tokio::time::interval(interval);
            interval_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = interval_timer.tick() => {
                        let removed = manager.cleanup_expired();
                        if removed > 0 {
                            tracing::info!(
                                "Session cleanup: removed {} expired sessions ({} remaining)",
                                removed,
                                manager.count()
                            );
                        }
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            tracing::info!("Session cleanup task shutting down");
                            break;
                        }
                    }
                }
            }
        });

        shutdown_tx
    }

    /// Create a session and open it with the personalised greeting.
    ///
    /// An existing session is left as it is; its greeting is returned.
    pub fn create_session(
        &self,
        key: &str,
        user_name: &str,
        brand: &str,
    ) -> Result<BotReply, ServerError> {
        let session = self.get_or_create(key)?;
        Ok(session.greet(user_name, brand))
    }

    /// Look up a session, creating it (without greeting) when absent
    pub fn get_or_create(&self, key: &str) -> Result<Arc<Session>, ServerError> {
        if let Some(session) = self.get(key) {
            return Ok(session);
        }

        let mut sessions = self.sessions.write();
        // Lost a race with another creator
        if let Some(session) = sessions.get(key) {
            return Ok(session.clone());
        }

        if sessions.len() >= self.max_sessions {
            self.cleanup_expired_internal(&mut sessions);

            if sessions.len() >= self.max_sessions {
                tracing::warn!(max = self.max_sessions, "Session capacity reached");
                return Err(Error::CapacityExceeded(self.max_sessions).into());
            }
        }

        let session = Arc::new(Session::new(key, self.classifier.clone(), self.rng_seed));
        sessions.insert(key.to_string(), session.clone());
        crate::metrics::set_active_sessions(sessions.len());

        tracing::info!(session = %key, "Created session");
        Ok(session)
    }

    /// Route a user message to its session.
    ///
    /// Unknown keys are created on the fly. Empty text is rejected before
    /// any session is created or touched.
    pub fn submit(&self, key: &str, text: &str) -> Result<(BotReply, DialogueStage), ServerError> {
        if text.trim().is_empty() {
            return Err(Error::EmptyInput.into());
        }
        let session = self.get_or_create(key)?;
        Ok(session.submit(text)?)
    }

    /// Return a session to `greeting` with empty slots
    pub fn reset(&self, key: &str) -> Result<(), ServerError> {
        let session = self.require(key)?;
        session.reset();
        Ok(())
    }

    /// Get a session by key
    pub fn get(&self, key: &str) -> Option<Arc<Session>> {
        self.sessions.read().get(key).cloned()
    }

    /// Remove a session and its log. Returns whether it existed.
    pub fn destroy_session(&self, key: &str) -> bool {
        let mut sessions = self.sessions.write();
        let removed = sessions.remove(key).is_some();
        if removed {
            crate::metrics::set_active_sessions(sessions.len());
            tracing::info!(session = %key, "Destroyed session");
        }
        removed
    }

    pub fn snapshot(&self, key: &str) -> Result<SessionSnapshot, ServerError> {
        Ok(self.require(key)?.snapshot())
    }

    pub fn messages(&self, key: &str) -> Result<Vec<Message>, ServerError> {
        Ok(self.require(key)?.messages())
    }

    /// Get active session count
    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }

    /// List all session keys
    pub fn list(&self) -> Vec<String> {
        self.sessions.read().keys().cloned().collect()
    }

    /// Remove expired sessions, returning how many were dropped
    pub fn cleanup_expired(&self) -> usize {
        let mut sessions = self.sessions.write();
        self.cleanup_expired_internal(&mut sessions)
    }

    fn cleanup_expired_internal(&self, sessions: &mut HashMap<String, Arc<Session>>) -> usize {
        let timeout = self.session_timeout;
        let expired: Vec<String> = sessions
            .iter()
            .filter(|(_, s)| s.is_expired(timeout))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            sessions.remove(key);
            tracing::info!(session = %key, "Expired session");
        }
        if !expired.is_empty() {
            crate::metrics::set_active_sessions(sessions.len());
        }
        expired.len()
    }

    fn require(&self, key: &str) -> Result<Arc<Session>, ServerError> {
        self.get(key)
            .ok_or_else(|| Error::SessionNotFound(key.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ywait_core::Sender;

    fn manager(max: usize) -> SessionManager {
        SessionManager::with_config(&DialogueConfig {
            max_sessions: max,
            rng_seed: Some(5),
            ..DialogueConfig::default()
        })
    }

    #[test]
    fn test_submit_auto_creates() {
        let manager = manager(10);
        let (reply, stage) = manager.submit("alice", "Check wait times").unwrap();
        assert_eq!(stage, DialogueStage::WaitTime);
        assert!(!reply.text.is_empty());
        assert_eq!(manager.count(), 1);
        // auto-created sessions carry no greeting
        assert_eq!(manager.messages("alice").unwrap().len(), 2);
    }

    #[test]
    fn test_empty_submit_creates_nothing() {
        let manager = manager(10);
        let err = manager.submit("bob", "   ").unwrap_err();
        assert!(matches!(err, ServerError::Core(Error::EmptyInput)));
        assert_eq!(manager.count(), 0);
    }

    #[test]
    fn test_create_session_greets_once() {
        let manager = manager(10);
        let first = manager.create_session("carol", "Carol", "Y-Wait Banking").unwrap();
        assert!(first.text.starts_with("Hello Carol!"));

        manager.submit("carol", "Check wait times").unwrap();
        let again = manager.create_session("carol", "Carol", "Y-Wait Banking").unwrap();
        assert_eq!(first, again);
        // state was not reset
        assert_eq!(manager.snapshot("carol").unwrap().stage, DialogueStage::WaitTime);
    }

    #[test]
    fn test_sessions_are_independent() {
        let manager = manager(10);
        manager.submit("a", "Join virtual queue").unwrap();
        manager.submit("b", "learn").unwrap();
        assert_eq!(manager.snapshot("a").unwrap().stage, DialogueStage::Service);
        assert_eq!(manager.snapshot("b").unwrap().stage, DialogueStage::Completed);
    }

    #[test]
    fn test_capacity() {
        let manager = manager(2);
        manager.get_or_create("a").unwrap();
        manager.get_or_create("b").unwrap();
        let err = manager.get_or_create("c").err().unwrap();
        assert!(matches!(err, ServerError::Core(Error::CapacityExceeded(2))));
        // existing keys are still reachable
        assert!(manager.get_or_create("a").is_ok());
    }

    #[test]
    fn test_destroy_then_submit_starts_fresh() {
        let manager = manager(10);
        manager.submit("dan", "Join virtual queue").unwrap();
        assert!(manager.destroy_session("dan"));
        assert!(!manager.destroy_session("dan"));
        assert!(manager.snapshot("dan").is_err());

        let (_, stage) = manager.submit("dan", "Card Services").unwrap();
        // fresh session: greeting rules apply, "services" means learn
        assert_eq!(stage, DialogueStage::Completed);
    }

    #[test]
    fn test_reset_unknown_key() {
        let manager = manager(10);
        let err = manager.reset("nobody").unwrap_err();
        assert!(matches!(err, ServerError::Core(Error::SessionNotFound(_))));
    }

    #[test]
    fn test_cleanup_expired() {
        let manager = SessionManager::with_config(&DialogueConfig {
            session_timeout_seconds: 1,
            cleanup_interval_seconds: 1,
            ..DialogueConfig::default()
        });
        manager.get_or_create("old").unwrap();
        assert_eq!(manager.cleanup_expired(), 0);

        std::thread::sleep(Duration::from_millis(1100));
        assert_eq!(manager.cleanup_expired(), 1);
        assert_eq!(manager.count(), 0);
    }

    #[test]
    fn test_concurrent_submits_on_one_key_stay_paired() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 50;

        let manager = Arc::new(manager(10));
        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let manager = Arc::clone(&manager);
                std::thread::spawn(move || {
                    for i in 0..PER_THREAD {
                        manager.submit("shared", &format!("t{t} m{i}")).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let messages = manager.messages("shared").unwrap();
        assert_eq!(messages.len(), 2 * THREADS * PER_THREAD);
        for pair in messages.chunks(2) {
            assert_eq!(pair[0].sender, Sender::User);
            assert_eq!(pair[1].sender, Sender::Bot);
        }

        let mut sent: Vec<_> = messages
            .iter()
            .filter(|m| m.sender == Sender::User)
            .map(|m| m.content.as_str())
            .collect();
        sent.sort_unstable();
        sent.dedup();
        assert_eq!(sent.len(), THREADS * PER_THREAD);
        assert_eq!(manager.count(), 1);
    }

    #[tokio::test]
    async fn test_cleanup_task_stops_on_signal() {
        let manager = Arc::new(manager(10));
        let shutdown = manager.start_cleanup_task();
        shutdown.send(true).unwrap();

        for _ in 0..100 {
            if shutdown.is_closed() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(shutdown.is_closed());
    }
}
