// Auth service - Shopify install handoff, sign-up/login and logout
use crate::application::session_service::SessionHolder;
use crate::application::store_api::AccountApi;
use crate::domain::session::{Session, ShopDomain};
use crate::error::AuthError;
use secrecy::SecretString;
use std::sync::Arc;

/// Query parameters Shopify hands back after the merchant approves the install.
#[derive(Debug, Clone, Default)]
pub struct OAuthCallback {
    pub code: Option<String>,
    pub shop: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRedirect {
    pub shop: ShopDomain,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackOutcome {
    /// `true` when an existing tenant re-authorized, `false` for a new install.
    pub is_login: bool,
}

#[derive(Clone)]
pub struct AuthService {
    api: Arc<dyn AccountApi>,
    session: SessionHolder,
}

impl AuthService {
    pub fn new(api: Arc<dyn AccountApi>, session: SessionHolder) -> Self {
        Self { api, session }
    }

    pub fn begin_install(&self, shop: &str) -> Result<InstallRedirect, AuthError> {
        let shop = ShopDomain::parse(shop)?;
        let url = self.api.install_url(&shop);
        Ok(InstallRedirect { shop, url })
    }

    pub async fn complete_callback(
        &self,
        callback: &OAuthCallback,
    ) -> Result<CallbackOutcome, AuthError> {
        let (Some(code), Some(shop)) = (
            callback.code.as_deref().filter(|c| !c.is_empty()),
            callback.shop.as_deref().filter(|s| !s.is_empty()),
        ) else {
            return Err(AuthError::MissingCallbackParams);
        };
        let shop = ShopDomain::parse(shop)?;
        let state = callback.state.as_deref().unwrap_or_default();

        let result = self.api.complete_callback(code, &shop, state).await?;
        if !result.success {
            return Err(AuthError::Rejected);
        }

        self.session.init(Session::new(shop));
        Ok(CallbackOutcome {
            is_login: result.is_login,
        })
    }

    pub async fn sign_up(
        &self,
        shop: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<ShopDomain, AuthError> {
        let shop = ShopDomain::parse(shop)?;
        let result = self
            .api
            .sign_up(&shop, email, password)
            .await
            .map_err(|e| match e.status_code() {
                Some(409) => AuthError::AccountExists,
                _ => AuthError::Api(e),
            })?;
        if !result.success {
            return Err(AuthError::Rejected);
        }
        Ok(shop)
    }

    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Session, AuthError> {
        let result = self.api.login(email, password).await?;
        let shop = match (result.success, result.shop) {
            (true, Some(shop)) => ShopDomain::parse(&shop)?,
            _ => return Err(AuthError::Rejected),
        };
        let session = Session::new(shop);
        self.session.init(session.clone());
        Ok(session)
    }

    /// Credential to reuse the current backend session from a later run.
    pub fn session_token(&self) -> Option<SecretString> {
        self.api.session_token()
    }

    /// End the session. A backend failure is logged; the local session is
    /// torn down regardless.
    pub async fn logout(&self) {
        if let Err(e) = self.api.logout().await {
            tracing::error!("Logout failed: {}", e);
        }
        self.session.teardown();
    }
}
