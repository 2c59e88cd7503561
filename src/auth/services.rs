use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::{
    password::{hash_password, verify_password},
    repo::UserRepo,
    repo_types::User,
};
use crate::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_USERNAME_LEN: usize = 50;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

lazy_static! {
    // verified against when the email is unknown so both login failures cost one argon2 run
    static ref DUMMY_HASH: String =
        hash_password("not-a-real-password").unwrap_or_default();
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Rejects a taken email before looking at the other fields, then validates,
/// hashes the password and stores the account.
pub async fn create_user(
    users: &dyn UserRepo,
    email: &str,
    username: &str,
    password: &str,
) -> Result<User, AppError> {
    let email = normalize_email(email);
    let username = username.trim();

    if !is_valid_email(&email) {
        return Err(AppError::Validation("Invalid email".into()));
    }
    if users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::DuplicateResource("Email already registered".into()));
    }

    if username.is_empty() || username.chars().count() > MAX_USERNAME_LEN {
        return Err(AppError::Validation(format!(
            "Username must be 1 to {MAX_USERNAME_LEN} characters"
        )));
    }
    validate_password(password)?;

    let hash = hash_password(password)?;
    // the unique index still guards against a concurrent registration
    let user = users.create(&email, username, &hash).await?;
    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(user)
}

pub async fn find_by_email(users: &dyn UserRepo, email: &str) -> Result<Option<User>, AppError> {
    users.find_by_email(&normalize_email(email)).await
}

/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn verify_credentials(
    users: &dyn UserRepo,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let Some(user) = find_by_email(users, email).await? else {
        let _ = verify_password(password, &DUMMY_HASH);
        warn!("login unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }
    Ok(user)
}

/// Loads the caller's account; deactivated accounts are refused.
pub async fn load_active_user(users: &dyn UserRepo, user_id: Uuid) -> Result<User, AppError> {
    let user = users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;
    if !user.is_active {
        return Err(AppError::Forbidden("Account is deactivated".into()));
    }
    Ok(user)
}

pub async fn change_password(
    users: &dyn UserRepo,
    user_id: Uuid,
    current: &str,
    new: &str,
) -> Result<(), AppError> {
    let user = load_active_user(users, user_id).await?;
    if !verify_password(current, &user.password_hash)? {
        warn!(user_id = %user.id, "change password with wrong current password");
        return Err(AppError::InvalidCredentials);
    }
    validate_password(new)?;

    let hash = hash_password(new)?;
    users.update_password(user.id, &hash).await?;
    info!(user_id = %user.id, "password changed");
    Ok(())
}

pub async fn deactivate(users: &dyn UserRepo, user_id: Uuid) -> Result<(), AppError> {
    let user = load_active_user(users, user_id).await?;
    users.deactivate(user.id).await?;
    info!(user_id = %user.id, "user deactivated");
    Ok(())
}
