//! Login, registration, profile update and logout.
//!
//! These are the only writers of the stored session.

use leptos::logging::log;

use crate::core::api::{ApiClient, ProfileUpdate, Registration};
use crate::core::error::{ApiError, FormError};
use crate::core::session::{KeyValueStore, SessionStore};
use crate::core::transport::Transport;
use crate::core::validation::{validate_login, validate_profile_update, validate_registration};
use crate::models::{Session, UserProfile};

/// Authenticate and persist the session.
pub async fn login<T: Transport, S: KeyValueStore>(
    api: &ApiClient<T>,
    store: &SessionStore<S>,
    email: &str,
    password: &str,
) -> Result<Session, FormError> {
    validate_login(email, password)?;
    let session = api
        .login(email.trim(), password)
        .await
        .map_err(|e| match e {
            ApiError::SessionExpired => FormError::InvalidCredentials,
            other => FormError::Api(other),
        })?;
    store.save(&session)?;
    log!("[auth] logged in as user {}", session.user.user_id.0);
    Ok(session)
}

/// Create the account, then log straight in.
pub async fn register<T: Transport, S: KeyValueStore>(
    api: &ApiClient<T>,
    store: &SessionStore<S>,
    form: &Registration,
) -> Result<Session, FormError> {
    validate_registration(form)?;
    let form = Registration {
        email: form.email.trim().to_string(),
        ..form.clone()
    };
    api.register(&form).await?;
    login(api, store, &form.email, &form.password).await
}

/// Submit a profile change and refresh the stored profile.
pub async fn update_profile<T: Transport, S: KeyValueStore>(
    api: &ApiClient<T>,
    store: &SessionStore<S>,
    form: &ProfileUpdate,
) -> Result<UserProfile, FormError> {
    validate_profile_update(form)?;
    let user = api.update_profile(form).await?;
    store.save_user(&user)?;
    Ok(user)
}

pub fn logout<S: KeyValueStore>(store: &SessionStore<S>) {
    store.clear();
    log!("[auth] logged out");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ValidationError;
    use crate::core::mock::{MemoryStore, MockTransport, session};
    use crate::core::transport::{Body, Method};

    const LOGIN_OK: &str = r#"{"token":"secret-token","user":{"user_id":1,"first_name":"Ada","last_name":"Lovelace","email":"ada@example.com"}}"#;

    #[tokio::test]
    async fn test_login_stores_session() {
        let transport = MockTransport::new();
        transport.respond_json("/auth/login", 200, LOGIN_OK);
        let store = SessionStore::new(MemoryStore::default());

        let logged_in = login(&ApiClient::new(transport), &store, "ada@example.com", "pw")
            .await
            .unwrap();
        assert_eq!(logged_in, session());
        assert_eq!(store.load(), Ok(session()));
    }

    #[tokio::test]
    async fn test_bad_credentials() {
        let transport = MockTransport::new();
        transport.respond_json("/auth/login", 401, r#"{"error":"Invalid credentials"}"#);
        let store = SessionStore::new(MemoryStore::default());
        let result = login(&ApiClient::new(transport), &store, "ada@example.com", "pw").await;
        assert_eq!(result, Err(FormError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let transport = MockTransport::new();
        transport.respond_json("/auth/register", 201, r#"{"message":"User registered successfully"}"#);
        transport.respond_json("/auth/login", 200, LOGIN_OK);
        let store = SessionStore::new(MemoryStore::default());
        let form = Registration {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: " ada@example.com ".into(),
            password: "Abcdefg1!".into(),
            password_confirmation: "Abcdefg1!".into(),
        };

        register(&ApiClient::new(transport.clone()), &store, &form)
            .await
            .unwrap();
        let paths: Vec<_> = transport.requests().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["/auth/register", "/auth/login"]);
        assert!(store.load().is_ok());
    }

    #[tokio::test]
    async fn test_weak_password_never_sent() {
        let transport = MockTransport::new();
        let store = SessionStore::new(MemoryStore::default());
        let form = Registration {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            password: "short".into(),
            password_confirmation: "short".into(),
        };
        let result = register(&ApiClient::new(transport.clone()), &store, &form).await;
        assert_eq!(
            result,
            Err(FormError::Validation(ValidationError::PasswordTooShort(8)))
        );
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_update_profile_refreshes_user() {
        let transport = MockTransport::new();
        transport.respond_json(
            "/auth/update-profile",
            200,
            r#"{"message":"ok","user":{"user_id":1,"first_name":"Grace","last_name":"Hopper","email":"grace@example.com"}}"#,
        );
        let store = SessionStore::new(MemoryStore::default());
        store.save(&session()).unwrap();
        let api = ApiClient::for_session(transport.clone(), &session());
        let form = ProfileUpdate {
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            email: "grace@example.com".into(),
            old_password: "old".into(),
            ..Default::default()
        };

        let user = update_profile(&api, &store, &form).await.unwrap();
        assert_eq!(user.first_name, "Grace");
        assert_eq!(store.load().unwrap().user.email, "grace@example.com");

        let sent = &transport.requests()[0];
        assert_eq!(sent.method, Method::Put);
        assert!(matches!(&sent.body, Body::Json(json) if json.contains("\"old_password\":\"old\"")));
    }

    #[test]
    fn test_logout_clears() {
        let memory = MemoryStore::default();
        let store = SessionStore::new(memory.clone());
        store.save(&session()).unwrap();
        logout(&store);
        assert!(memory.is_empty());
    }
}
