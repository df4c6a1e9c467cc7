//! Authentication service
//!
//! Handles registration, activation, login, token refresh, and logout.

use community_common::auth::{hash_password, validate_password_strength, verify_password};
use community_common::AppError;
use community_core::entities::Account;
use community_core::events::{Notification, NotificationTarget};
use community_core::{DomainError, Snowflake};
use tracing::{info, instrument, warn};

use crate::dto::{
    ActivateRequest, AuthResponse, CurrentAccountResponse, LoginRequest, LogoutRequest,
    RefreshTokenRequest, RegisterRequest, RegisterResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new account.
    ///
    /// The account starts inactive and an activation token is handed to the
    /// notification sink, unless the context auto-activates accounts.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<RegisterResponse> {
        validate_password_strength(&request.password)?;

        let password_hash = hash_password(&request.password)?;

        let mut account = Account::new(
            self.ctx.generate_id(),
            request.username.trim().to_string(),
            request.email.trim().to_string(),
        );
        account.set_names(non_empty(request.first_name), non_empty(request.last_name));
        if self.ctx.auto_activate() {
            account.activate();
        }

        self.ctx.account_repo().create(&account, &password_hash).await?;

        info!(account_id = %account.id, "Account registered");

        if !account.is_active {
            let token = self.ctx.activation_tokens().issue(account.id).await?;
            self.ctx
                .notify(
                    Notification::new(account.id, "activation", NotificationTarget::Account(account.id))
                        .to(account.id)
                        .with_description(token),
                )
                .await;
        }

        Ok(RegisterResponse {
            activation_required: !account.is_active,
            account: CurrentAccountResponse::from(&account),
        })
    }

    /// Redeem an activation token
    #[instrument(skip(self, request))]
    pub async fn activate(&self, request: ActivateRequest) -> ServiceResult<CurrentAccountResponse> {
        let account_id = self
            .ctx
            .activation_tokens()
            .consume(&request.token)
            .await?
            .ok_or(DomainError::InvalidActivationToken)?;

        let mut account = self
            .ctx
            .account_repo()
            .find_by_id(account_id)
            .await?
            .ok_or(DomainError::AccountNotFound(account_id))?;

        account.activate();
        self.ctx.account_repo().update(&account).await?;

        info!(account_id = %account_id, "Account activated");

        Ok(CurrentAccountResponse::from(&account))
    }

    /// Login with email and password
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let account = self
            .ctx
            .account_repo()
            .find_by_email(request.email.trim())
            .await?
            .ok_or_else(|| {
                warn!("Login failed: unknown email");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        let password_hash = self
            .ctx
            .account_repo()
            .get_password_hash(account.id)
            .await?
            .ok_or_else(|| {
                warn!(account_id = %account.id, "Login failed: no password hash");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        // A malformed stored hash is treated like a wrong password
        if !verify_password(&request.password, &password_hash).unwrap_or(false) {
            warn!(account_id = %account.id, "Login failed: invalid password");
            return Err(ServiceError::App(AppError::InvalidCredentials));
        }

        if !account.is_active {
            return Err(DomainError::AccountInactive.into());
        }

        info!(account_id = %account.id, "Account logged in");

        self.issue_tokens(&account).await
    }

    /// Exchange a live refresh token for a new pair. The old token is
    /// revoked, so each refresh token works once.
    #[instrument(skip(self, request))]
    pub async fn refresh(&self, request: RefreshTokenRequest) -> ServiceResult<AuthResponse> {
        let claims = self
            .ctx
            .jwt_service()
            .validate_refresh_token(&request.refresh_token)?;
        let account_id = claims.account_id()?;

        let owner = self.ctx.refresh_sessions().revoke(&claims.jti).await?;
        if owner != Some(account_id) {
            warn!(account_id = %account_id, "Refresh with revoked or unknown token");
            return Err(AppError::InvalidToken.into());
        }

        let account = self
            .ctx
            .account_repo()
            .find_by_id(account_id)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if !account.is_active {
            return Err(DomainError::AccountInactive.into());
        }

        self.issue_tokens(&account).await
    }

    /// Revoke the given refresh token, or every session of the account
    #[instrument(skip(self, request))]
    pub async fn logout(&self, account_id: Snowflake, request: LogoutRequest) -> ServiceResult<()> {
        let claims = self
            .ctx
            .jwt_service()
            .validate_refresh_token(&request.refresh_token)?;
        if claims.account_id()? != account_id {
            return Err(AppError::InvalidToken.into());
        }

        if request.everywhere {
            let revoked = self.ctx.refresh_sessions().revoke_all(account_id).await?;
            info!(account_id = %account_id, revoked, "Logged out everywhere");
        } else {
            self.ctx.refresh_sessions().revoke(&claims.jti).await?;
            info!(account_id = %account_id, "Logged out");
        }

        Ok(())
    }

    async fn issue_tokens(&self, account: &Account) -> ServiceResult<AuthResponse> {
        let pair = self.ctx.jwt_service().issue(account.id)?;
        self.ctx
            .refresh_sessions()
            .store(&pair.refresh_jti, account.id)
            .await?;

        Ok(AuthResponse::new(
            pair.access_token,
            pair.refresh_token,
            pair.expires_in,
            CurrentAccountResponse::from(account),
        ))
    }
}

/// Treat blank optional text as absent
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{TestWorld, TEST_PASSWORD};

    fn register_request(username: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: TEST_PASSWORD.to_string(),
            first_name: Some("Ada".to_string()),
            last_name: Some("  ".to_string()),
        }
    }

    fn login_request(username: &str) -> LoginRequest {
        LoginRequest {
            email: format!("{username}@example.com"),
            password: TEST_PASSWORD.to_string(),
        }
    }

    fn activation_token(world: &TestWorld) -> String {
        world
            .notifications()
            .into_iter()
            .find(|n| n.verb == "activation")
            .and_then(|n| n.description)
            .unwrap()
    }

    #[tokio::test]
    async fn test_register_then_activate_then_login() {
        let world = TestWorld::new();
        let auth = AuthService::new(&world.ctx);

        let registered = auth.register(register_request("ada")).await.unwrap();
        assert!(registered.activation_required);
        assert!(!registered.account.is_active);
        assert_eq!(registered.account.first_name.as_deref(), Some("Ada"));
        assert_eq!(registered.account.last_name, None);

        let err = auth.login(login_request("ada")).await.unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::AccountInactive)));

        let token = activation_token(&world);
        let activated = auth
            .activate(ActivateRequest { token: token.clone() })
            .await
            .unwrap();
        assert!(activated.is_active);

        // single use
        let err = auth.activate(ActivateRequest { token }).await.unwrap_err();
        assert!(matches!(
            err.as_domain(),
            Some(DomainError::InvalidActivationToken)
        ));

        let tokens = auth.login(login_request("ada")).await.unwrap();
        assert_eq!(tokens.token_type, "Bearer");
        assert_eq!(world.store.state().refresh_sessions.len(), 1);
    }

    #[tokio::test]
    async fn test_auto_activation_skips_token() {
        let world = TestWorld::auto_activating();
        let auth = AuthService::new(&world.ctx);

        let registered = auth.register(register_request("bob")).await.unwrap();
        assert!(!registered.activation_required);
        assert!(world.notifications().is_empty());
        assert!(auth.login(login_request("bob")).await.is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_username_and_email() {
        let world = TestWorld::auto_activating();
        let auth = AuthService::new(&world.ctx);
        auth.register(register_request("carol")).await.unwrap();

        let mut same_name = register_request("carol");
        same_name.email = "other@example.com".to_string();
        let err = auth.register(same_name).await.unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::UsernameTaken)));

        let mut same_email = register_request("dave");
        same_email.email = "CAROL@example.com".to_string();
        let err = auth.register(same_email).await.unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_weak_password_rejected() {
        let world = TestWorld::new();
        let mut request = register_request("erin");
        request.password = "password".to_string();
        let err = AuthService::new(&world.ctx).register(request).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let world = TestWorld::auto_activating();
        let auth = AuthService::new(&world.ctx);
        auth.register(register_request("finn")).await.unwrap();

        let mut request = login_request("finn");
        request.password = "Wr0ngHorse".to_string();
        let err = auth.login(request).await.unwrap_err();
        assert_eq!(err.status_code(), 401);
    }

    #[tokio::test]
    async fn test_refresh_rotates_token() {
        let world = TestWorld::auto_activating();
        let auth = AuthService::new(&world.ctx);
        auth.register(register_request("gus")).await.unwrap();
        let first = auth.login(login_request("gus")).await.unwrap();

        let second = auth
            .refresh(RefreshTokenRequest {
                refresh_token: first.refresh_token.clone(),
            })
            .await
            .unwrap();
        assert_ne!(second.refresh_token, first.refresh_token);

        let err = auth
            .refresh(RefreshTokenRequest {
                refresh_token: first.refresh_token,
            })
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 401);
    }

    #[tokio::test]
    async fn test_logout_everywhere() {
        let world = TestWorld::auto_activating();
        let auth = AuthService::new(&world.ctx);
        let account = auth.register(register_request("hal")).await.unwrap().account;
        let account_id = Snowflake::parse(&account.id).unwrap();

        let first = auth.login(login_request("hal")).await.unwrap();
        auth.login(login_request("hal")).await.unwrap();
        assert_eq!(world.store.state().refresh_sessions.len(), 2);

        auth.logout(
            account_id,
            LogoutRequest {
                refresh_token: first.refresh_token,
                everywhere: true,
            },
        )
        .await
        .unwrap();
        assert!(world.store.state().refresh_sessions.is_empty());
    }
}
