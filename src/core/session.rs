//! Session persistence.
//!
//! [`SessionStore`] is the single reader/writer of the `token` and `user`
//! entries in persistent storage. Validity is structural only: a token must be
//! present and the stored user must carry a user id.

use leptos::logging::warn;

use crate::config::{TOKEN_KEY, USER_KEY};
use crate::core::api::wire::WireUser;
use crate::core::error::{SessionError, StorageError};
use crate::models::{Session, UserProfile};
use crate::utils::dom;

/// String key/value storage (localStorage in the browser).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str);
}

/// `window.localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStore;

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        dom::local_storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        dom::local_storage()
            .ok_or(StorageError::Unavailable)?
            .set_item(key, value)
            .map_err(|_| StorageError::WriteFailed)
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = dom::local_storage() {
            let _ = storage.remove_item(key);
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SessionStore<S> {
    store: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Restore the stored session.
    ///
    /// A partial or malformed entry is cleared before the error is returned,
    /// so the next load reports [`SessionError::Missing`].
    pub fn load(&self) -> Result<Session, SessionError> {
        let token = self.store.get(TOKEN_KEY).filter(|t| !t.trim().is_empty());
        let user = self.store.get(USER_KEY);

        let (token, user) = match (token, user) {
            (None, None) => return Err(SessionError::Missing),
            (Some(token), Some(user)) => (token, user),
            (token, _) => {
                let missing = if token.is_none() { TOKEN_KEY } else { USER_KEY };
                return Err(self.reject(format!("{missing} entry missing")));
            }
        };

        let user = serde_json::from_str::<WireUser>(&user)
            .map_err(|e| e.to_string())
            .and_then(UserProfile::try_from)
            .map_err(|e| self.reject(e))?;
        Ok(Session { user, token })
    }

    fn reject(&self, reason: String) -> SessionError {
        warn!("[session] discarding stored session: {}", reason);
        self.clear();
        SessionError::Malformed(reason)
    }

    pub fn save(&self, session: &Session) -> Result<(), StorageError> {
        self.store.set(TOKEN_KEY, &session.token)?;
        self.save_user(&session.user)
    }

    /// Replace the stored profile, keeping the token.
    pub fn save_user(&self, user: &UserProfile) -> Result<(), StorageError> {
        let json = serde_json::to_string(user).map_err(|_| StorageError::SerializationFailed)?;
        self.store.set(USER_KEY, &json)
    }

    /// Remove both entries.
    pub fn clear(&self) {
        self.store.remove(TOKEN_KEY);
        self.store.remove(USER_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mock::{MemoryStore, session};

    #[test]
    fn test_round_trip() {
        let store = SessionStore::new(MemoryStore::default());
        store.save(&session()).unwrap();
        assert_eq!(store.load(), Ok(session()));
    }

    #[test]
    fn test_missing() {
        let store = SessionStore::new(MemoryStore::default());
        assert_eq!(store.load(), Err(SessionError::Missing));
    }

    #[test]
    fn test_user_without_id_is_cleared() {
        let memory = MemoryStore::default();
        memory.set(TOKEN_KEY, "tok").unwrap();
        memory.set(USER_KEY, r#"{"first_name":"Ada"}"#).unwrap();
        let store = SessionStore::new(memory.clone());

        assert!(matches!(store.load(), Err(SessionError::Malformed(_))));
        assert_eq!(memory.get(TOKEN_KEY), None);
        assert_eq!(store.load(), Err(SessionError::Missing));
    }

    #[test]
    fn test_token_without_user_is_cleared() {
        let memory = MemoryStore::default();
        memory.set(TOKEN_KEY, "tok").unwrap();
        let store = SessionStore::new(memory.clone());
        assert!(matches!(store.load(), Err(SessionError::Malformed(_))));
        assert!(memory.is_empty());
    }

    #[test]
    fn test_string_user_id_accepted() {
        let memory = MemoryStore::default();
        memory.set(TOKEN_KEY, "tok").unwrap();
        memory
            .set(USER_KEY, r#"{"user_id":"12","first_name":"A","last_name":"B","email":"a@b.c"}"#)
            .unwrap();
        let loaded = SessionStore::new(memory).load().unwrap();
        assert_eq!(loaded.user.user_id.0, 12);
    }

    #[test]
    fn test_save_user_keeps_token() {
        let store = SessionStore::new(MemoryStore::default());
        store.save(&session()).unwrap();
        let mut user = session().user;
        user.first_name = "Grace".into();
        store.save_user(&user).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.token, "secret-token");
        assert_eq!(loaded.user.first_name, "Grace");
    }
}
