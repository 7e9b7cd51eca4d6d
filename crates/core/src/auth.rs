//! Mocked sign-in.
//!
//! There is no account backend. A fixed [`UserDirectory`] of demo users answers logins, and a
//! successful login or signup simply records the user in the persisted [`AuthSession`].
//! Passwords never leave the directory; the session only ever holds the password-free [`User`].

use crate::constants::AUTH_STORAGE_KEY;
use crate::persisted::Persisted;
use crate::storage::KeyValueStore;
use crate::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use medcodes_types::{EmailAddress, NonEmptyText};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: NonEmptyText,
    pub email: EmailAddress,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Fields a signed-in user may change. `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: Option<NonEmptyText>,
    pub organization: Option<String>,
    pub specialty: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.organization.is_none() && self.specialty.is_none()
    }

    fn apply_to(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(organization) = self.organization {
            user.organization = Some(organization);
        }
        if let Some(specialty) = self.specialty {
            user.specialty = Some(specialty);
        }
    }
}

/// Who is signed in. Persisted under `auth-storage`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub is_authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_in_at: Option<DateTime<Utc>>,
}

impl AuthSession {
    pub fn sign_in(&mut self, user: User, at: DateTime<Utc>) {
        self.user = Some(user);
        self.is_authenticated = true;
        self.signed_in_at = Some(at);
    }

    pub fn sign_out(&mut self) {
        *self = AuthSession::default();
    }

    /// Merges `update` into the signed-in user. Does nothing when signed out.
    pub fn apply_profile(&mut self, update: ProfileUpdate) -> Option<&User> {
        let user = self.user.as_mut()?;
        update.apply_to(user);
        Some(user)
    }
}

#[derive(Debug, Clone)]
struct DirectoryEntry {
    user: User,
    password: String,
}

/// Known accounts and their passwords.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    entries: Vec<DirectoryEntry>,
}

impl UserDirectory {
    /// The two demo accounts: an administrator and a regular user.
    pub fn demo() -> CoreResult<Self> {
        let mut directory = UserDirectory::default();
        directory.insert(
            User {
                id: "1".into(),
                name: NonEmptyText::new("Admin User")?,
                email: EmailAddress::parse("admin@medcodes.com")?,
                role: Role::Admin,
                organization: Some("MedCodes Inc.".into()),
                specialty: Some("Medical Coding".into()),
            },
            "admin123",
        );
        directory.insert(
            User {
                id: "2".into(),
                name: NonEmptyText::new("Regular User")?,
                email: EmailAddress::parse("user@example.com")?,
                role: Role::User,
                organization: Some("General Hospital".into()),
                specialty: Some("Cardiology".into()),
            },
            "user123",
        );
        Ok(directory)
    }

    pub fn insert(&mut self, user: User, password: impl Into<String>) {
        self.entries.push(DirectoryEntry {
            user,
            password: password.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_email(&self, email: &str) -> bool {
        self.entries.iter().any(|e| e.user.email.as_str() == email)
    }

    /// Exact match on both email and password.
    pub fn authenticate(&self, email: &str, password: &str) -> CoreResult<User> {
        self.entries
            .iter()
            .find(|e| e.user.email.as_str() == email && e.password == password)
            .map(|e| e.user.clone())
            .ok_or(CoreError::InvalidCredentials)
    }

    /// Builds the account a signup would create, without adding it to the directory.
    pub fn prepare_signup(&self, name: &str, email: &str, password: &str) -> CoreResult<User> {
        let name = NonEmptyText::new(name)?;
        let email = EmailAddress::parse(email)?;
        if password.trim().is_empty() {
            return Err(CoreError::InvalidInput("password cannot be empty".into()));
        }
        if self.contains_email(email.as_str()) {
            return Err(CoreError::EmailTaken);
        }

        Ok(User {
            id: (self.len() + 1).to_string(),
            name,
            email,
            role: Role::User,
            organization: None,
            specialty: None,
        })
    }
}

/// Login, signup and profile edits over a persisted session.
#[derive(Debug)]
pub struct AuthService {
    directory: UserDirectory,
    session: Persisted<AuthSession>,
}

impl AuthService {
    pub fn new(directory: UserDirectory, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            directory,
            session: Persisted::load(AUTH_STORAGE_KEY, storage),
        }
    }

    /// Signs in a directory user.
    ///
    /// # Errors
    /// [`CoreError::InvalidCredentials`] when no account matches. The current session is left
    /// untouched in that case.
    pub fn login(&self, email: &str, password: &str) -> CoreResult<User> {
        let user = self.directory.authenticate(email, password)?;
        self.session.update(|s| s.sign_in(user.clone(), Utc::now()));
        tracing::info!(user_id = %user.id, role = %user.role, "signed in");
        Ok(user)
    }

    /// Creates a regular account and signs it in.
    ///
    /// # Errors
    /// Blank name or password, a malformed email, or an email already in the directory.
    pub fn signup(&self, name: &str, email: &str, password: &str) -> CoreResult<User> {
        let user = self.directory.prepare_signup(name, email, password)?;
        self.session.update(|s| s.sign_in(user.clone(), Utc::now()));
        tracing::info!(user_id = %user.id, "signed up");
        Ok(user)
    }

    pub fn logout(&self) {
        self.session.update(AuthSession::sign_out);
        tracing::info!("signed out");
    }

    /// Returns the updated user, or `None` if nobody is signed in.
    pub fn update_profile(&self, update: ProfileUpdate) -> Option<User> {
        if !self.is_authenticated() {
            return None;
        }
        self.session.update(|s| s.apply_profile(update).cloned())
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.read(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.read(|s| s.is_authenticated && s.user.is_some())
    }

    pub fn session(&self) -> AuthSession {
        self.session.snapshot()
    }

    pub fn directory(&self) -> &UserDirectory {
        &self.directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use medcodes_types::TextError;

    fn service() -> (Arc<MemoryStore>, AuthService) {
        let store = Arc::new(MemoryStore::new());
        let auth = AuthService::new(UserDirectory::demo().unwrap(), store.clone());
        (store, auth)
    }

    #[test]
    fn demo_admin_can_log_in() {
        let (_, auth) = service();
        let user = auth.login("admin@medcodes.com", "admin123").unwrap();
        assert!(user.is_admin());
        assert_eq!(user.id, "1");
        assert!(auth.is_authenticated());
        assert_eq!(auth.current_user(), Some(user));
        assert!(auth.session().signed_in_at.is_some());
    }

    #[test]
    fn wrong_password_is_rejected_and_session_unchanged() {
        let (_, auth) = service();
        auth.login("user@example.com", "user123").unwrap();

        let err = auth.login("admin@medcodes.com", "wrong").unwrap_err();
        assert!(matches!(err, CoreError::InvalidCredentials));
        assert_eq!(err.to_string(), "Invalid email or password");
        assert_eq!(auth.current_user().map(|u| u.id), Some("2".to_owned()));
    }

    #[test]
    fn login_email_match_is_exact() {
        let (_, auth) = service();
        assert!(auth.login("Admin@medcodes.com", "admin123").is_err());
        assert!(!auth.is_authenticated());
    }

    #[test]
    fn signup_creates_regular_user_without_registering_it() {
        let (_, auth) = service();
        let user = auth.signup("Dana", "dana@clinic.org", "secret").unwrap();
        assert_eq!(user.id, "3");
        assert_eq!(user.role, Role::User);
        assert!(auth.is_authenticated());

        assert_eq!(auth.directory().len(), 2);
        let again = auth.signup("Dana", "dana@clinic.org", "secret").unwrap();
        assert_eq!(again.id, "3");
    }

    #[test]
    fn signup_rejects_existing_email() {
        let (_, auth) = service();
        let err = auth.signup("Someone", "user@example.com", "pw").unwrap_err();
        assert_eq!(err.to_string(), "User with this email already exists");
        assert!(!auth.is_authenticated());
    }

    #[test]
    fn signup_rejects_blank_fields() {
        let (_, auth) = service();
        assert!(matches!(
            auth.signup("  ", "a@b.c", "pw"),
            Err(CoreError::Text(TextError::Empty))
        ));
        assert!(matches!(
            auth.signup("Dana", "not-an-email", "pw"),
            Err(CoreError::Text(TextError::InvalidEmail(_)))
        ));
        assert!(matches!(
            auth.signup("Dana", "a@b.c", " "),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn update_profile_merges_fields() {
        let (_, auth) = service();
        auth.login("user@example.com", "user123").unwrap();

        let updated = auth
            .update_profile(ProfileUpdate {
                specialty: Some("Oncology".into()),
                ..ProfileUpdate::default()
            })
            .unwrap();
        assert_eq!(updated.specialty.as_deref(), Some("Oncology"));
        assert_eq!(updated.organization.as_deref(), Some("General Hospital"));
        assert_eq!(updated.name.as_str(), "Regular User");
    }

    #[test]
    fn update_profile_when_signed_out_is_noop() {
        let (store, auth) = service();
        let update = ProfileUpdate {
            name: Some(NonEmptyText::new("Ghost").unwrap()),
            ..ProfileUpdate::default()
        };
        assert_eq!(auth.update_profile(update), None);
        assert_eq!(store.get(AUTH_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn logout_clears_session() {
        let (_, auth) = service();
        auth.login("admin@medcodes.com", "admin123").unwrap();
        auth.logout();
        assert!(!auth.is_authenticated());
        assert_eq!(auth.session(), AuthSession::default());
    }

    #[test]
    fn session_is_persisted_without_password() {
        let (store, auth) = service();
        auth.login("admin@medcodes.com", "admin123").unwrap();

        let blob = store.get(AUTH_STORAGE_KEY).unwrap().unwrap();
        assert_eq!(blob["version"], 0);
        assert_eq!(blob["state"]["isAuthenticated"], true);
        assert_eq!(blob["state"]["user"]["email"], "admin@medcodes.com");
        assert_eq!(blob["state"]["user"]["role"], "admin");
        assert!(!blob.to_string().contains("admin123"));

        let restored = AuthService::new(UserDirectory::demo().unwrap(), store);
        assert_eq!(restored.current_user().map(|u| u.id), Some("1".to_owned()));
    }
}
