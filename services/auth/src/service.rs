//! Registration, login and profile lookup

use std::sync::Arc;

use common::error::DatabaseError;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{AuthError, AuthResult},
    jwt::{IssuedToken, JwtService},
    models::{LoginCredentials, NewUser, RegisterRequest, Role, User, UserSummary},
    password::CredentialHasher,
    repositories::UserStore,
    validation,
};

/// Successful login: a fresh session token and the user it belongs to
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: IssuedToken,
    pub user: UserSummary,
}

/// Credential verification on top of a [`UserStore`]
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: CredentialHasher,
    jwt: JwtService,
    /// Hash checked when the email is unknown, so both failure paths cost
    /// the same
    decoy_hash: Arc<str>,
}

fn required<'a>(value: &'a Option<String>, message: &str) -> AuthResult<&'a str> {
    match value.as_deref() {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AuthError::Validation(message.to_string())),
    }
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: CredentialHasher,
        jwt: JwtService,
    ) -> AuthResult<Self> {
        let decoy_hash = hasher.hash(&Uuid::new_v4().to_string())?;

        Ok(Self {
            users,
            hasher,
            jwt,
            decoy_hash: decoy_hash.into(),
        })
    }

    /// Create an account; the email must not already be registered
    pub async fn register(&self, request: RegisterRequest) -> AuthResult<User> {
        const MISSING: &str = "Missing required fields (displayName, email, password)";
        let display_name = required(&request.display_name, MISSING)?.trim();
        let email = required(&request.email, MISSING)?.trim();
        let password = required(&request.password, MISSING)?;

        validation::validate_display_name(display_name).map_err(AuthError::Validation)?;
        validation::validate_email(email).map_err(AuthError::Validation)?;
        validation::validate_password(password).map_err(AuthError::Validation)?;

        if self.users.find_by_email(email).await?.is_some() {
            info!("Registration refused, email already in use: {}", email);
            return Err(AuthError::Duplicate);
        }

        let password_hash = self.hasher.hash_blocking(password.to_string()).await?;

        let new_user = NewUser {
            display_name: display_name.to_string(),
            email: email.to_string(),
            password_hash,
            role: Role::User,
        };

        let user = self.users.create(&new_user).await.map_err(|e| match e {
            DatabaseError::UniqueViolation(_) => AuthError::Duplicate,
            other => AuthError::Database(other),
        })?;

        info!("Registered user {}", user.id);
        Ok(user)
    }

    /// Check an email/password pair. Unknown emails and wrong passwords fail
    /// identically with [`AuthError::InvalidCredentials`].
    pub async fn authenticate(&self, email: &str, password: &str) -> AuthResult<UserSummary> {
        let user = self.users.find_by_email(email).await?;

        let (password_hash, user) = match user {
            Some(user) => (user.password_hash.clone(), Some(user)),
            None => (self.decoy_hash.to_string(), None),
        };

        let matches = self
            .hasher
            .verify_blocking(password.to_string(), password_hash)
            .await?;

        match user {
            Some(user) if matches => Ok(user.summary()),
            _ => {
                warn!("Failed login attempt for {}", email);
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Authenticate and issue a session token
    pub async fn login(&self, credentials: LoginCredentials) -> AuthResult<LoginOutcome> {
        const MISSING: &str = "Missing credentials (email, password)";
        let email = required(&credentials.email, MISSING)?.trim();
        let password = required(&credentials.password, MISSING)?;

        let user = self.authenticate(email, password).await?;
        let token = self.jwt.issue(user.id)?;

        info!("User {} logged in", user.id);
        Ok(LoginOutcome { token, user })
    }

    /// Resolve a bearer token to a user id
    pub fn verify_token(&self, token: &str) -> AuthResult<Uuid> {
        self.jwt.verify(token)
    }

    /// Load the profile behind a verified user id
    pub async fn profile(&self, user_id: Uuid) -> AuthResult<UserSummary> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(|user| user.summary())
            .ok_or(AuthError::UserNotFound)
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }
}
