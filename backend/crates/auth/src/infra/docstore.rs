//! Document Store Repository Implementations
//!
//! Users live in the `users` collection, sessions in `sessions`. Field names
//! are camelCase and timestamps are Unix milliseconds.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use platform::docstore::{DocStoreError, DocumentStore, Query, StoredDocument, encode};
use serde::{Deserialize, Serialize};

use crate::domain::entity::{
    session::Session,
    user::{DEFAULT_SOURCE, User},
};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{
    email::Email,
    user_id::{SessionId, UserId},
    user_password::UserPassword,
    user_status::UserStatus,
};
use crate::error::{AuthError, AuthResult};

pub const USERS: &str = "users";
pub const SESSIONS: &str = "sessions";

/// Auth repository backed by any [`DocumentStore`]
pub struct DocAuthRepository<S> {
    store: Arc<S>,
}

impl<S> Clone for DocAuthRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: DocumentStore> DocAuthRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

// ============================================================================
// Records
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    id: String,
    name: String,
    email: String,
    password_hash: String,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default = "default_source")]
    source: String,
    #[serde(default)]
    status: UserStatus,
    created_at: i64,
    updated_at: i64,
}

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

impl UserRecord {
    fn from_entity(user: &User) -> Self {
        Self {
            id: user.user_id.to_string(),
            name: user.name.clone(),
            email: user.email.as_str().to_string(),
            password_hash: user.password.as_phc_string().to_string(),
            company: user.company.clone(),
            phone: user.phone.clone(),
            source: user.source.clone(),
            status: user.status,
            created_at: user.created_at.timestamp_millis(),
            updated_at: user.updated_at.timestamp_millis(),
        }
    }

    fn into_entity(self) -> AuthResult<User> {
        Ok(User {
            user_id: parse_id(&self.id)?,
            name: self.name,
            email: Email::from_db(self.email),
            password: UserPassword::from_phc_string(self.password_hash)?,
            company: self.company,
            phone: self.phone,
            source: self.source,
            status: self.status,
            created_at: from_millis(self.created_at)?,
            updated_at: from_millis(self.updated_at)?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionRecord {
    id: String,
    user_id: String,
    token_hash: String,
    created_at: i64,
    expires_at: i64,
}

impl SessionRecord {
    fn from_entity(session: &Session) -> Self {
        Self {
            id: session.session_id.to_string(),
            user_id: session.user_id.to_string(),
            token_hash: session.token_hash.clone(),
            created_at: session.created_at.timestamp_millis(),
            expires_at: session.expires_at.timestamp_millis(),
        }
    }

    fn into_entity(self) -> AuthResult<Session> {
        Ok(Session {
            session_id: parse_id(&self.id)?,
            user_id: parse_id(&self.user_id)?,
            token_hash: self.token_hash,
            created_at: from_millis(self.created_at)?,
            expires_at: from_millis(self.expires_at)?,
        })
    }
}

fn parse_id<T>(raw: &str) -> AuthResult<kernel::id::Id<T>> {
    kernel::id::Id::parse(raw)
        .ok_or_else(|| AuthError::Internal(format!("Malformed id in document store: {raw}")))
}

fn from_millis(ms: i64) -> AuthResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| AuthError::Internal(format!("Timestamp out of range: {ms}")))
}

fn decode_user(doc: &StoredDocument) -> AuthResult<User> {
    doc.decode::<UserRecord>()?.into_entity()
}

fn decode_session(doc: &StoredDocument) -> AuthResult<Session> {
    doc.decode::<SessionRecord>()?.into_entity()
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl<S: DocumentStore + Sync + 'static> UserRepository for DocAuthRepository<S> {
    async fn create_user(&self, user: &User) -> AuthResult<()> {
        if self.find_by_email(&user.email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let data = encode(&UserRecord::from_entity(user))?;

        match self
            .store
            .insert(USERS, &user.user_id.to_string(), data)
            .await
        {
            Ok(_) => Ok(()),
            // Unique email index raced us
            Err(DocStoreError::AlreadyExists { .. }) => Err(AuthError::EmailTaken),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        self.store
            .get(USERS, &user_id.to_string())
            .await?
            .map(|doc| decode_user(&doc))
            .transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let query = Query::new().eq("email", email.as_str()).limit(1);

        self.store
            .find(USERS, &query)
            .await?
            .first()
            .map(decode_user)
            .transpose()
    }

    async fn update_user(&self, user: &User) -> AuthResult<()> {
        let data = encode(&UserRecord::from_entity(user))?;

        match self
            .store
            .update(USERS, &user.user_id.to_string(), data, None)
            .await
        {
            Ok(_) => Ok(()),
            Err(DocStoreError::NotFound { .. }) => Err(AuthError::UserNotFound),
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl<S: DocumentStore + Sync + 'static> SessionRepository for DocAuthRepository<S> {
    async fn create_session(&self, session: &Session) -> AuthResult<()> {
        let data = encode(&SessionRecord::from_entity(session))?;
        self.store
            .insert(SESSIONS, &session.session_id.to_string(), data)
            .await?;
        Ok(())
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> AuthResult<Option<Session>> {
        let query = Query::new().eq("tokenHash", token_hash).limit(1);

        self.store
            .find(SESSIONS, &query)
            .await?
            .first()
            .map(decode_session)
            .transpose()
    }

    async fn delete_session(&self, session: &Session) -> AuthResult<bool> {
        Ok(self
            .store
            .delete(SESSIONS, &session.session_id.to_string())
            .await?)
    }

    async fn delete_all_for_user(&self, user_id: &UserId) -> AuthResult<u64> {
        let query = Query::new().eq("userId", user_id.to_string());
        Ok(self.store.delete_where(SESSIONS, &query).await?)
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let now_ms = Utc::now().timestamp_millis();
        let query = Query::new().lt("expiresAt", now_ms);

        let deleted = self.store.delete_where(SESSIONS, &query).await?;

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired sessions");

        Ok(deleted)
    }
}

impl<S> std::fmt::Debug for DocAuthRepository<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocAuthRepository").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_password::RawPassword;
    use chrono::Duration;
    use platform::docstore::MemoryDocumentStore;

    fn repo() -> (Arc<MemoryDocumentStore>, DocAuthRepository<MemoryDocumentStore>) {
        let store = Arc::new(MemoryDocumentStore::new());
        (store.clone(), DocAuthRepository::new(store))
    }

    fn user(email: &str) -> User {
        let raw = RawPassword::new("demo123".to_string()).unwrap();
        User::new(
            "Demo".to_string(),
            Email::new(email).unwrap(),
            UserPassword::from_raw(&raw, None).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_user_roundtrip_by_id_and_email() {
        let (store, repo) = repo();
        let user = user("demo@lpfacil.com");
        repo.create_user(&user).await.unwrap();

        let by_id = repo.find_by_id(&user.user_id).await.unwrap().unwrap();
        assert_eq!(by_id.email, user.email);
        assert_eq!(by_id.created_at.timestamp_millis(), user.created_at.timestamp_millis());

        let by_email = repo
            .find_by_email(&Email::new("DEMO@lpfacil.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.user_id, user.user_id);

        let stored = store
            .get(USERS, &user.user_id.to_string())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.data["status"], "active");
        assert!(stored.data["passwordHash"].as_str().unwrap().starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let (_, repo) = repo();
        repo.create_user(&user("demo@lpfacil.com")).await.unwrap();
        let err = repo.create_user(&user("demo@lpfacil.com")).await.unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let (_, repo) = repo();
        let err = repo.update_user(&user("ghost@lpfacil.com")).await.unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
    }

    #[tokio::test]
    async fn test_session_lookup_and_cleanup() {
        let (store, repo) = repo();
        let owner = UserId::new();

        let live = Session::new(owner, "a".repeat(64), Duration::hours(24));
        let stale = Session::new(owner, "b".repeat(64), Duration::hours(-1));
        repo.create_session(&live).await.unwrap();
        repo.create_session(&stale).await.unwrap();

        let found = repo.find_by_token_hash(&"a".repeat(64)).await.unwrap().unwrap();
        assert_eq!(found.session_id, live.session_id);
        assert!(repo.find_by_token_hash(&"c".repeat(64)).await.unwrap().is_none());

        assert_eq!(repo.cleanup_expired().await.unwrap(), 1);
        assert_eq!(store.count(SESSIONS), 1);

        assert!(repo.delete_session(&live).await.unwrap());
        assert!(!repo.delete_session(&live).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_all_for_user() {
        let (store, repo) = repo();
        let owner = UserId::new();
        let other = UserId::new();

        for (user_id, hash) in [(owner, "a"), (owner, "b"), (other, "c")] {
            let session = Session::new(user_id, hash.repeat(64), Duration::hours(1));
            repo.create_session(&session).await.unwrap();
        }

        assert_eq!(repo.delete_all_for_user(&owner).await.unwrap(), 2);
        assert_eq!(store.count(SESSIONS), 1);
    }

    #[test]
    fn test_session_id_type() {
        let id: SessionId = parse_id(&SessionId::new().to_string()).unwrap();
        assert_eq!(id.as_uuid().get_version_num(), 4);
        assert!(parse_id::<kernel::id::markers::Session>("nope").is_err());
    }
}
