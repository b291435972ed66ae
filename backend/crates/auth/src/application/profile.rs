//! Profile Use Cases
//!
//! A user only ever reads and writes their own profile.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{user_id::UserId, user_status::UserStatus};
use crate::error::{AuthError, AuthResult};

/// Own-profile projection (no password hash)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub source: String,
    pub status: UserStatus,
    /// Unix milliseconds
    pub created_at: i64,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.user_id,
            name: user.name.clone(),
            email: user.email.as_str().to_string(),
            company: user.company.clone(),
            phone: user.phone.clone(),
            source: user.source.clone(),
            status: user.status,
            created_at: user.created_at.timestamp_millis(),
        }
    }
}

/// Get profile use case
pub struct GetProfileUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> GetProfileUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, user_id: &UserId) -> AuthResult<UserProfile> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(UserProfile::from(&user))
    }
}

/// Profile update input; absent fields are left unchanged
#[derive(Debug, Default)]
pub struct UpdateProfileInput {
    pub name: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
}

/// Update profile use case
pub struct UpdateProfileUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> UpdateProfileUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(
        &self,
        user_id: &UserId,
        input: UpdateProfileInput,
    ) -> AuthResult<UserProfile> {
        let mut user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if let Some(name) = input.name {
            user.set_name(&name)?;
        }
        if input.company.is_some() {
            user.set_company(input.company)?;
        }
        if input.phone.is_some() {
            user.set_phone(input.phone)?;
        }

        self.user_repo.update_user(&user).await?;

        tracing::info!(user_id = %user.user_id, "Profile updated");

        Ok(UserProfile::from(&user))
    }
}
