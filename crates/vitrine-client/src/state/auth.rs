//! # Auth Store
//!
//! Who is logged in, with which bearer token.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌───────────────┐   login ok    ┌───────────────────────────────┐    │
//! │   │ Anonymous     │──────────────►│ Authenticated { user, token } │    │
//! │   │ (None)        │◄──────────────│                               │    │
//! │   └───────┬───────┘    logout     └───────────────────────────────┘    │
//! │           │                                                             │
//! │           │ login fails / register                                      │
//! │           ▼                                                             │
//! │     state unchanged                                                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Registration creates the account server-side only; the caller logs in
//! afterwards. Inputs are checked locally before any request goes out.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, warn};
use vitrine_core::validation::{
    validate_email, validate_login_password, validate_new_password, validate_person_name,
};
use vitrine_core::User;

use crate::api::{LoginRequest, RegisterRequest, StorefrontApi};
use crate::error::{ClientError, ClientResult};
use crate::guard::InFlight;

/// The authenticated half of the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

/// Login state shared by the session and front end.
pub struct AuthStore<A> {
    api: Arc<A>,
    session: Arc<RwLock<Option<AuthSession>>>,
    in_flight: InFlight,
}

impl<A> Clone for AuthStore<A> {
    fn clone(&self) -> Self {
        AuthStore {
            api: Arc::clone(&self.api),
            session: Arc::clone(&self.session),
            in_flight: self.in_flight.clone(),
        }
    }
}

impl<A: StorefrontApi> AuthStore<A> {
    /// Creates an anonymous store.
    pub fn new(api: Arc<A>) -> Self {
        AuthStore {
            api,
            session: Arc::new(RwLock::new(None)),
            in_flight: InFlight::new(),
        }
    }

    /// Logs in and stores the returned user and token.
    ///
    /// ## Errors
    /// - `Core(Validation)` for a malformed email or empty password
    /// - `Busy` while another login/register is pending
    /// - `Authentication` when the server rejects the credentials; the
    ///   stored session is left as it was
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<User> {
        let email = email.trim();
        validate_email(email)?;
        validate_login_password(password)?;

        let _ticket = self.in_flight.enter("login")?;
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = match self.api.login(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(email = %email, error = %e, "Login failed");
                return Err(e);
            }
        };

        info!(user_id = %response.user.id, role = %response.user.role, "Logged in");
        let user = response.user.clone();
        self.write(Some(AuthSession {
            user: response.user,
            token: response.access_token,
        }));
        Ok(user)
    }

    /// Creates an account server-side. The local session is not touched.
    ///
    /// ## Errors
    /// `Validation` (e.g. duplicate email) from the server, or local input
    /// errors before any request.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> ClientResult<User> {
        let name = name.trim();
        let email = email.trim();
        validate_person_name(name)?;
        validate_email(email)?;
        validate_new_password(password)?;

        let _ticket = self.in_flight.enter("register")?;
        let request = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };

        let user = self.api.register(&request).await.map_err(|e| {
            warn!(email = %email, error = %e, "Registration failed");
            e
        })?;

        info!(user_id = %user.id, "Account registered");
        Ok(user)
    }

    /// Clears user and token. Calling it while anonymous is a no-op.
    pub fn logout(&self) {
        if self.write(None).is_some() {
            info!("Logged out");
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// A copy of the authenticated session, if any.
    pub fn session(&self) -> Option<AuthSession> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.session().map(|s| s.user)
    }

    pub fn token(&self) -> Option<String> {
        self.session().map(|s| s.token)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map_or(false, |s| s.user.is_admin())
    }

    /// Whether a login or register request is in flight.
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_busy()
    }

    /// The bearer token for a protected call.
    ///
    /// ## Errors
    /// `Authorization` when nobody is logged in.
    pub fn require_token(&self) -> ClientResult<String> {
        self.token()
            .ok_or_else(|| ClientError::Authorization("Login required".to_string()))
    }

    /// The bearer token for an admin-only call.
    ///
    /// ## Errors
    /// `Authorization` when nobody is logged in or the user is not an admin.
    pub fn require_admin(&self) -> ClientResult<String> {
        let session = self
            .session()
            .ok_or_else(|| ClientError::Authorization("Login required".to_string()))?;

        if !session.user.is_admin() {
            return Err(ClientError::Authorization(
                "Admin role required".to_string(),
            ));
        }
        Ok(session.token)
    }

    fn write(&self, value: Option<AuthSession>) -> Option<AuthSession> {
        let mut session = self.session.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *session, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeApi, ADMIN_EMAIL, PASSWORD, TAKEN_EMAIL, TOKEN};
    use std::sync::atomic::Ordering;
    use vitrine_core::{CoreError, Role};

    fn store() -> (Arc<FakeApi>, AuthStore<FakeApi>) {
        let api = Arc::new(FakeApi::default());
        (Arc::clone(&api), AuthStore::new(api))
    }

    #[tokio::test]
    async fn test_login_stores_user_and_token() {
        let (_, auth) = store();

        let user = auth.login(" ana@loja.example ", PASSWORD).await.unwrap();

        assert_eq!(user.email, "ana@loja.example");
        assert!(auth.is_authenticated());
        assert!(!auth.is_admin());
        assert_eq!(auth.token().as_deref(), Some(TOKEN));
        assert_eq!(auth.current_user(), Some(user));
        assert!(!auth.is_loading());
    }

    #[tokio::test]
    async fn test_wrong_password_leaves_state_unauthenticated() {
        let (_, auth) = store();

        let err = auth.login("ana@loja.example", "wrong-pass").await.unwrap_err();

        assert!(matches!(err, ClientError::Authentication(_)));
        assert!(!auth.is_authenticated());
        assert!(auth.token().is_none());
        assert!(!auth.is_loading());
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_server() {
        let (api, auth) = store();

        let err = auth.login("not-an-email", PASSWORD).await.unwrap_err();
        assert!(matches!(err, ClientError::Core(CoreError::Validation(_))));

        let err = auth.login("ana@loja.example", "").await.unwrap_err();
        assert!(matches!(err, ClientError::Core(CoreError::Validation(_))));

        let err = auth
            .register("Ana", "ana@loja.example", "123")
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Core(CoreError::Validation(_))));

        assert!(api.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_does_not_log_in() {
        let (_, auth) = store();

        let user = auth
            .register("Bia", "bia@loja.example", "secret1")
            .await
            .unwrap();

        assert_eq!(user.name, "Bia");
        assert_eq!(user.role, Role::User);
        assert!(!auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let (_, auth) = store();

        let err = auth
            .register("Bia", TAKEN_EMAIL, "secret1")
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Validation(m) if m == "Email already registered"));
        assert!(!auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let (_, auth) = store();
        auth.login(ADMIN_EMAIL, PASSWORD).await.unwrap();
        assert!(auth.is_admin());

        auth.logout();
        assert!(!auth.is_authenticated());
        assert!(!auth.is_admin());

        auth.logout();
        assert!(auth.session().is_none());
    }

    #[tokio::test]
    async fn test_require_admin() {
        let (_, auth) = store();
        assert!(matches!(
            auth.require_admin(),
            Err(ClientError::Authorization(m)) if m == "Login required"
        ));

        auth.login("ana@loja.example", PASSWORD).await.unwrap();
        assert!(auth.require_token().is_ok());
        assert!(matches!(
            auth.require_admin(),
            Err(ClientError::Authorization(m)) if m == "Admin role required"
        ));

        auth.login(ADMIN_EMAIL, PASSWORD).await.unwrap();
        assert_eq!(auth.require_admin().unwrap(), TOKEN);
    }

    #[tokio::test]
    async fn test_second_login_while_pending_is_busy() {
        let (api, auth) = store();
        api.hold.store(true, Ordering::SeqCst);

        let pending = {
            let auth = auth.clone();
            tokio::spawn(async move { auth.login("ana@loja.example", PASSWORD).await })
        };
        while !auth.is_loading() {
            tokio::task::yield_now().await;
        }

        let err = auth.login("ana@loja.example", PASSWORD).await.unwrap_err();
        assert!(matches!(err, ClientError::Busy { operation: "login" }));

        api.release();
        pending.await.unwrap().unwrap();
        assert!(auth.is_authenticated());
        assert!(!auth.is_loading());
        assert_eq!(api.call_count("login"), 1);
    }
}
