//! User Entity
//!
//! An account owner. The password hash never leaves the auth crate.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    email::Email, user_id::UserId, user_password::UserPassword, user_status::UserStatus,
};
use crate::error::{AuthError, AuthResult};

/// Maximum display name length, in characters
pub const NAME_MAX_LENGTH: usize = 100;

/// Maximum length of the optional profile fields
pub const PROFILE_FIELD_MAX_LENGTH: usize = 100;

/// Acquisition source recorded when signup does not name one
pub const DEFAULT_SOURCE: &str = "website";

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub name: String,
    /// Login identifier, unique
    pub email: Email,
    pub password: UserPassword,
    pub company: Option<String>,
    pub phone: Option<String>,
    /// Where the signup came from
    pub source: String,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new active user
    pub fn new(name: String, email: Email, password: UserPassword) -> AuthResult<Self> {
        let now = Utc::now();

        Ok(Self {
            user_id: UserId::new(),
            name: Self::validate_name(&name)?,
            email,
            password,
            company: None,
            phone: None,
            source: DEFAULT_SOURCE.to_string(),
            status: UserStatus::default(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Trimmed name, 1..=100 characters
    pub fn validate_name(name: &str) -> AuthResult<String> {
        let name = name.trim();

        if name.is_empty() {
            return Err(AuthError::MissingField("name"));
        }

        if name.chars().count() > NAME_MAX_LENGTH {
            return Err(AuthError::Validation(format!(
                "Name must be at most {NAME_MAX_LENGTH} characters"
            )));
        }

        Ok(name.to_string())
    }

    /// Trimmed optional field; blank clears it
    pub fn normalize_optional(
        field: &'static str,
        value: Option<String>,
    ) -> AuthResult<Option<String>> {
        let Some(value) = value else {
            return Ok(None);
        };

        let value = value.trim();
        if value.is_empty() {
            return Ok(None);
        }

        if value.chars().count() > PROFILE_FIELD_MAX_LENGTH {
            return Err(AuthError::Validation(format!(
                "{field} must be at most {PROFILE_FIELD_MAX_LENGTH} characters"
            )));
        }

        Ok(Some(value.to_string()))
    }

    pub fn can_login(&self) -> bool {
        self.status.can_login()
    }

    pub fn set_name(&mut self, name: &str) -> AuthResult<()> {
        self.name = Self::validate_name(name)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn set_company(&mut self, company: Option<String>) -> AuthResult<()> {
        self.company = Self::normalize_optional("company", company)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn set_phone(&mut self, phone: Option<String>) -> AuthResult<()> {
        self.phone = Self::normalize_optional("phone", phone)?;
        self.updated_at = Utc::now();
        Ok(())
    }
}
