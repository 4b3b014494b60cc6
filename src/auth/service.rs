use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::{AuthError, SessionStore};
use crate::models::{AuthResponse, LoginRequest, MessageResponse, SignupRequest, User};

#[derive(Debug, Clone)]
pub struct AuthService {
    db: PgPool,
    sessions: SessionStore,
}

impl AuthService {
    pub fn new(db: PgPool, sessions: SessionStore) -> Self {
        Self { db, sessions }
    }

    /// Register a new user
    pub async fn signup(&self, request: SignupRequest) -> Result<AuthResponse, AuthError> {
        let (name, email, password) = match (request.name, request.email, request.password) {
            (Some(name), Some(email), Some(password))
                if !name.trim().is_empty()
                    && !email.trim().is_empty()
                    && !password.is_empty() =>
            {
                (name, email, password)
            }
            _ => {
                return Err(AuthError::Validation(
                    "Name, email, and password are required".to_string(),
                ))
            }
        };

        // email matching is case-insensitive throughout
        let email = email.trim().to_lowercase();

        if self.get_user_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = hash_password(&password)?;
        let user_id = Uuid::new_v4();
        let now = Utc::now();

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, email, password, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $5)
             RETURNING id, name, email, password, created_at, updated_at",
        )
        .bind(user_id)
        .bind(&name)
        .bind(&email)
        .bind(&password_hash)
        .bind(now)
        .fetch_one(&self.db)
        .await
        .map_err(AuthError::Database)?;

        let token = self.sessions.issue(user.id);
        tracing::info!(user_id = %user.id, "new user registered");

        Ok(AuthResponse {
            user: user.into(),
            token,
            message: "Account created successfully".to_string(),
        })
    }

    /// Login user
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        let (email, password) = match (request.email, request.password) {
            (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
                (email, password)
            }
            _ => {
                return Err(AuthError::Validation(
                    "Email and password are required".to_string(),
                ))
            }
        };

        let user = self
            .get_user_by_email(email.trim())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.sessions.issue(user.id);

        Ok(AuthResponse {
            user: user.into(),
            token,
            message: "Login successful".to_string(),
        })
    }

    /// Logout user (revoke the session token)
    pub async fn logout(&self, token: &str) -> Result<MessageResponse, AuthError> {
        self.sessions.revoke(token);

        Ok(MessageResponse {
            message: "Logout successful".to_string(),
        })
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, created_at, updated_at
             FROM users WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .map_err(AuthError::Database)?;

        Ok(user)
    }
}
