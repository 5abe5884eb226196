//! Authentication service - Handles user authentication and authorization.
//!
//! Accounts start as `NON_USER`. Confirming the emailed code grants `USER`.
//! Both the confirmation and password-change flows redeem codes recorded by
//! the verification workflow; redeeming never sends mail itself.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{
    generate_code, Gender, NewUser, Password, User, VerificationType, MAX_NICKNAME_LENGTH,
    SECONDS_PER_HOUR, TOKEN_TYPE_BEARER,
};
use user_service_lib::{UserService, VerificationService};

use crate::config::AuthServiceConfig;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Hash used when the account does not exist, so sign-in takes the same time
/// either way.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TokenResponse {
    /// JWT access token
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token expiration time in seconds
    pub expires_in: i64,
}

/// Sign-up input (plain-text password)
#[derive(Debug, Clone)]
pub struct SignUp {
    pub email: String,
    pub password: String,
    pub nickname: String,
    pub birth: NaiveDate,
    pub gender: Gender,
}

/// Authentication service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a `NON_USER` account and queue its confirmation mail
    async fn sign_up(&self, request: SignUp) -> AppResult<User>;

    /// Check credentials and issue a token
    async fn sign_in(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Redeem a `VALIDATE_EMAIL` code; grants `USER` and issues a fresh token
    async fn validate_email(&self, email: String, code: String) -> AppResult<TokenResponse>;

    /// Queue a `CHANGE_PASSWORD` mail for an existing account
    async fn request_password_change(&self, email: String) -> AppResult<()>;

    /// Redeem a `CHANGE_PASSWORD` code and store the new password
    async fn change_password(
        &self,
        email: String,
        code: String,
        new_password: String,
    ) -> AppResult<()>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Issue a new token from current account data
    async fn refresh_token(&self, claims: &Claims) -> AppResult<TokenResponse>;
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    users: Arc<dyn UserService>,
    verifications: Arc<dyn VerificationService>,
    jwt_secret: String,
    jwt_expiration_hours: i64,
}

impl Authenticator {
    pub fn new(
        users: Arc<dyn UserService>,
        verifications: Arc<dyn VerificationService>,
        config: &AuthServiceConfig,
    ) -> Self {
        Self {
            users,
            verifications,
            jwt_secret: config.jwt_secret.clone(),
            jwt_expiration_hours: config.jwt_expiration_hours,
        }
    }

    fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Generate JWT token for a user
    fn generate_token(&self, user: &User) -> AppResult<TokenResponse> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.jwt_expiration_hours);

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret_bytes()),
        )?;

        Ok(TokenResponse {
            access_token: token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.jwt_expiration_hours * SECONDS_PER_HOUR,
        })
    }

    async fn existing_user(&self, email: &str) -> AppResult<User> {
        self.users
            .find_by_email(email)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Accept `code` when a matching, unexpired verification exists.
    async fn redeem(
        &self,
        email: &str,
        code: &str,
        verification_type: VerificationType,
    ) -> AppResult<()> {
        let verification = self
            .verifications
            .find_latest(email, code, verification_type)
            .await?;

        match verification {
            Some(v) if !v.is_expired(Utc::now()) => Ok(()),
            _ => Err(AppError::invalid_argument(
                "Invalid or expired verification code",
            )),
        }
    }

    async fn issue_code(
        &self,
        user: &User,
        verification_type: VerificationType,
    ) -> AppResult<()> {
        self.verifications
            .create(user.email.clone(), user.id, generate_code(), verification_type)
            .await?;
        Ok(())
    }
}

fn normalize_email(email: &str) -> AppResult<String> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::invalid_argument("email must be a valid address"));
    }
    Ok(email.to_string())
}

#[async_trait]
impl AuthService for Authenticator {
    async fn sign_up(&self, request: SignUp) -> AppResult<User> {
        let email = normalize_email(&request.email)?;
        let nickname = request.nickname.trim().to_string();
        if nickname.is_empty() || nickname.chars().count() > MAX_NICKNAME_LENGTH {
            return Err(AppError::invalid_argument(format!(
                "nickname must be 1 to {} characters",
                MAX_NICKNAME_LENGTH
            )));
        }

        let password_hash = Password::new(&request.password)?.into_string();

        let user = self
            .users
            .create_user(NewUser {
                email,
                password_hash,
                nickname,
                birth: request.birth,
                gender: request.gender,
            })
            .await?;

        self.issue_code(&user, VerificationType::ValidateEmail).await?;
        tracing::info!(user_id = %user.id, "User signed up");
        Ok(user)
    }

    async fn sign_in(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let user = self.users.find_by_email(email.trim()).await?;

        // Verify against a dummy hash for unknown accounts to keep timing uniform
        let password_hash = user
            .as_ref()
            .map(|u| u.password_hash.as_str())
            .unwrap_or(DUMMY_HASH);
        let password_valid = Password::from_hash(password_hash).verify(&password);

        match user {
            Some(user) if password_valid => self.generate_token(&user),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    async fn validate_email(&self, email: String, code: String) -> AppResult<TokenResponse> {
        let user = self.existing_user(email.trim()).await?;
        self.redeem(&user.email, code.trim(), VerificationType::ValidateEmail)
            .await?;

        let user = self.users.grant_user_role(user.id).await?;
        self.generate_token(&user)
    }

    async fn request_password_change(&self, email: String) -> AppResult<()> {
        let user = self.existing_user(email.trim()).await?;
        self.issue_code(&user, VerificationType::ChangePassword).await
    }

    async fn change_password(
        &self,
        email: String,
        code: String,
        new_password: String,
    ) -> AppResult<()> {
        let user = self.existing_user(email.trim()).await?;
        self.redeem(&user.email, code.trim(), VerificationType::ChangePassword)
            .await?;

        let password_hash = Password::new(&new_password)?.into_string();
        self.users.update_password(user.id, password_hash).await?;
        tracing::info!(user_id = %user.id, "Password changed");
        Ok(())
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    async fn refresh_token(&self, claims: &Claims) -> AppResult<TokenResponse> {
        // Fresh user data so the token carries the current role
        let user = self
            .users
            .find_by_email(&claims.email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        self.generate_token(&user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use domain::{UserRole, VerificationRequest, VerificationStatus};
    use mockall::predicate::eq;
    use user_service_lib::service::{MockUserService, MockVerificationService};

    const SECRET: &str = "a-very-long-secret-used-only-in-unit-tests";

    fn config() -> AuthServiceConfig {
        AuthServiceConfig::new(SECRET.to_string(), 24).unwrap()
    }

    fn user_with(password: &str, role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            email: "traveler@withaeng.com".to_string(),
            password_hash: Password::new(password).unwrap().into_string(),
            nickname: "traveler".to_string(),
            introduction: None,
            profile_image_url: None,
            birth: NaiveDate::from_ymd_opt(1993, 3, 3).unwrap(),
            gender: Gender::Male,
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn verification(
        user: &User,
        verification_type: VerificationType,
        age: ChronoDuration,
    ) -> VerificationRequest {
        VerificationRequest {
            id: Uuid::new_v4(),
            email: user.email.clone(),
            user_id: user.id,
            code: "A1".to_string(),
            verification_type,
            status: VerificationStatus::Done,
            created_at: Utc::now() - age,
        }
    }

    fn authenticator(users: MockUserService, verifications: MockVerificationService) -> Authenticator {
        Authenticator::new(Arc::new(users), Arc::new(verifications), &config())
    }

    #[tokio::test]
    async fn test_sign_up_creates_validate_email_verification() {
        let created = user_with("TripTogether1", UserRole::NonUser);
        let created_id = created.id;

        let mut users = MockUserService::new();
        users
            .expect_create_user()
            .times(1)
            .returning(move |_| Ok(created.clone()));
        let mut verifications = MockVerificationService::new();
        verifications
            .expect_create()
            .withf(move |email, user_id, code, verification_type| {
                email == "traveler@withaeng.com"
                    && *user_id == created_id
                    && !code.is_empty()
                    && *verification_type == VerificationType::ValidateEmail
            })
            .times(1)
            .returning(|email, user_id, code, verification_type| {
                Ok(VerificationRequest {
                    id: Uuid::new_v4(),
                    email,
                    user_id,
                    code,
                    verification_type,
                    status: VerificationStatus::Pending,
                    created_at: Utc::now(),
                })
            });

        let auth = authenticator(users, verifications);
        let user = auth
            .sign_up(SignUp {
                email: " traveler@withaeng.com ".to_string(),
                password: "TripTogether1".to_string(),
                nickname: "traveler".to_string(),
                birth: NaiveDate::from_ymd_opt(1993, 3, 3).unwrap(),
                gender: Gender::Male,
            })
            .await
            .unwrap();

        assert_eq!(user.role, UserRole::NonUser);
    }

    #[tokio::test]
    async fn test_sign_up_rejects_short_password() {
        let mut users = MockUserService::new();
        users.expect_create_user().never();

        let auth = authenticator(users, MockVerificationService::new());
        let result = auth
            .sign_up(SignUp {
                email: "traveler@withaeng.com".to_string(),
                password: "short".to_string(),
                nickname: "traveler".to_string(),
                birth: NaiveDate::from_ymd_opt(1993, 3, 3).unwrap(),
                gender: Gender::Male,
            })
            .await;

        assert!(matches!(result, Err(AppError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_sign_in_issues_verifiable_token() {
        let user = user_with("TripTogether1", UserRole::User);
        let user_id = user.id;
        let mut users = MockUserService::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let auth = authenticator(users, MockVerificationService::new());
        let token = auth
            .sign_in("traveler@withaeng.com".to_string(), "TripTogether1".to_string())
            .await
            .unwrap();

        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 24 * 3600);

        let claims = auth.verify_token(&token.access_token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, "USER");
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password_or_unknown_user() {
        let user = user_with("TripTogether1", UserRole::User);
        let mut users = MockUserService::new();
        users.expect_find_by_email().returning(move |email| {
            Ok((email == "traveler@withaeng.com").then(|| user.clone()))
        });

        let auth = authenticator(users, MockVerificationService::new());

        let wrong = auth
            .sign_in("traveler@withaeng.com".to_string(), "WrongPassword".to_string())
            .await;
        let unknown = auth
            .sign_in("ghost@withaeng.com".to_string(), "TripTogether1".to_string())
            .await;

        assert!(matches!(wrong, Err(AppError::InvalidCredentials)));
        assert!(matches!(unknown, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_validate_email_grants_user_role() {
        let pending = user_with("TripTogether1", UserRole::NonUser);
        let redeemable = verification(&pending, VerificationType::ValidateEmail, ChronoDuration::minutes(5));
        let pending_id = pending.id;

        let mut users = MockUserService::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(pending.clone())));
        users
            .expect_grant_user_role()
            .with(eq(pending_id))
            .times(1)
            .returning(|_| Ok(user_with("TripTogether1", UserRole::User)));
        let mut verifications = MockVerificationService::new();
        verifications
            .expect_find_latest()
            .returning(move |_, _, _| Ok(Some(redeemable.clone())));

        let auth = authenticator(users, verifications);
        let token = auth
            .validate_email("traveler@withaeng.com".to_string(), "A1".to_string())
            .await
            .unwrap();

        assert_eq!(auth.verify_token(&token.access_token).unwrap().role, "USER");
    }

    #[tokio::test]
    async fn test_validate_email_rejects_expired_code() {
        let pending = user_with("TripTogether1", UserRole::NonUser);
        let expired = verification(&pending, VerificationType::ValidateEmail, ChronoDuration::hours(25));

        let mut users = MockUserService::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(pending.clone())));
        users.expect_grant_user_role().never();
        let mut verifications = MockVerificationService::new();
        verifications
            .expect_find_latest()
            .returning(move |_, _, _| Ok(Some(expired.clone())));

        let auth = authenticator(users, verifications);
        let result = auth
            .validate_email("traveler@withaeng.com".to_string(), "A1".to_string())
            .await;

        assert!(matches!(result, Err(AppError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_request_password_change_for_unknown_email() {
        let mut users = MockUserService::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        let mut verifications = MockVerificationService::new();
        verifications.expect_create().never();

        let auth = authenticator(users, verifications);
        let result = auth
            .request_password_change("ghost@withaeng.com".to_string())
            .await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_change_password_stores_new_hash() {
        let user = user_with("TripTogether1", UserRole::User);
        let redeemable = verification(&user, VerificationType::ChangePassword, ChronoDuration::hours(1));
        let user_id = user.id;

        let mut users = MockUserService::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));
        users
            .expect_update_password()
            .withf(move |id, hash| {
                *id == user_id && Password::from_hash(hash.as_str()).verify("NewSecret123")
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let mut verifications = MockVerificationService::new();
        verifications
            .expect_find_latest()
            .withf(|email, code, verification_type| {
                email == "traveler@withaeng.com"
                    && code == "A1"
                    && *verification_type == VerificationType::ChangePassword
            })
            .returning(move |_, _, _| Ok(Some(redeemable.clone())));

        let auth = authenticator(users, verifications);
        auth.change_password(
            "traveler@withaeng.com".to_string(),
            "A1".to_string(),
            "NewSecret123".to_string(),
        )
        .await
        .unwrap();
    }

    #[test]
    fn test_verify_token_rejects_foreign_signature() {
        let auth = authenticator(MockUserService::new(), MockVerificationService::new());
        let other = Authenticator::new(
            Arc::new(MockUserService::new()),
            Arc::new(MockVerificationService::new()),
            &AuthServiceConfig::new("another-secret-that-is-long-enough!!".to_string(), 1).unwrap(),
        );
        let token = other
            .generate_token(&user_with("TripTogether1", UserRole::User))
            .unwrap();

        assert!(matches!(
            auth.verify_token(&token.access_token),
            Err(AppError::Jwt(_))
        ));
    }
}
