//! Account directory stored in the users collection.
//!
//! Accounts carry a plaintext password next to the public [`User`] fields,
//! which matches the demo storage layout. Sign-in compares the exact email
//! and password; disabled accounts cannot sign in.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use quizgate_core::model::{short_id, Role, User};
use quizgate_core::store::{load_typed, save_typed, USERS_KEY};
use quizgate_core::traits::{CollectionStore, UserDirectory};

use crate::error::DirectoryError;

type Result<T> = std::result::Result<T, DirectoryError>;

/// A stored account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(flatten)]
    pub user: User,
    pub password: String,
}

impl Account {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            user: User {
                id: short_id("u_"),
                name: name.into(),
                email: email.into(),
                role,
                active: true,
                created_at: Some(Utc::now()),
            },
            password: password.into(),
        }
    }
}

/// [`UserDirectory`] backed by a [`CollectionStore`], with a signed-in
/// slot.
pub struct StoredDirectory {
    collections: Arc<dyn CollectionStore>,
    current: Mutex<Option<User>>,
}

impl StoredDirectory {
    pub fn new(collections: Arc<dyn CollectionStore>) -> Self {
        Self {
            collections,
            current: Mutex::new(None),
        }
    }

    fn accounts(&self) -> Result<Vec<Account>> {
        Ok(load_typed(self.collections.as_ref(), USERS_KEY)?)
    }

    fn save(&self, accounts: &[Account]) -> Result<()> {
        Ok(save_typed(self.collections.as_ref(), USERS_KEY, accounts)?)
    }

    /// Every account's public fields, newest first.
    pub fn users(&self) -> Result<Vec<User>> {
        Ok(self.accounts()?.into_iter().map(|a| a.user).collect())
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .accounts()?
            .into_iter()
            .find(|a| a.user.email == email)
            .map(|a| a.user))
    }

    /// Sign in with an exact email and password match.
    pub fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        let email = email.trim();
        let account = self
            .accounts()?
            .into_iter()
            .find(|a| a.user.email == email && a.password == password)
            .ok_or(DirectoryError::InvalidCredentials)?;
        if !account.user.active {
            tracing::warn!(user = %account.user.id, "sign-in refused, account disabled");
            return Err(DirectoryError::AccountDisabled);
        }
        tracing::info!(user = %account.user.id, "signed in as {}", account.user.name);
        *self.current.lock().unwrap() = Some(account.user.clone());
        Ok(account.user)
    }

    pub fn sign_out(&self) {
        if let Some(user) = self.current.lock().unwrap().take() {
            tracing::info!(user = %user.id, "signed out");
        }
    }

    /// Self-service sign-up. New accounts are always students.
    pub fn register(&self, name: &str, email: &str, password: &str) -> Result<User> {
        self.add_account(name, email, password, Role::Student)
    }

    /// Administrator-created account with an explicit role.
    pub fn add_account(&self, name: &str, email: &str, password: &str, role: Role) -> Result<User> {
        let (name, email) = (name.trim(), email.trim());
        if name.is_empty() {
            return Err(DirectoryError::MissingField("name"));
        }
        if email.is_empty() {
            return Err(DirectoryError::MissingField("email"));
        }
        if password.is_empty() {
            return Err(DirectoryError::MissingField("password"));
        }

        let mut accounts = self.accounts()?;
        if accounts.iter().any(|a| a.user.email == email) {
            return Err(DirectoryError::DuplicateEmail(email.to_string()));
        }
        let account = Account::new(name, email, password, role);
        let user = account.user.clone();
        accounts.insert(0, account);
        self.save(&accounts)?;
        Ok(user)
    }

    /// Insert accounts as-is, skipping emails already present.
    pub fn seed(&self, seed: impl IntoIterator<Item = Account>) -> Result<usize> {
        let mut accounts = self.accounts()?;
        let mut added = 0;
        for account in seed {
            if accounts.iter().any(|a| a.user.email == account.user.email) {
                continue;
            }
            accounts.push(account);
            added += 1;
        }
        self.save(&accounts)?;
        Ok(added)
    }

    pub fn set_active(&self, user_id: &str, active: bool) -> Result<User> {
        self.update(user_id, |user| user.active = active)
    }

    pub fn set_role(&self, user_id: &str, role: Role) -> Result<User> {
        self.update(user_id, |user| user.role = role)
    }

    /// Rename the signed-in user.
    pub fn rename_current(&self, name: &str) -> Result<User> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DirectoryError::MissingField("name"));
        }
        let id = self
            .current_user()
            .map(|u| u.id)
            .ok_or_else(|| DirectoryError::UnknownUser("signed-in user".into()))?;
        self.update(&id, |user| user.name = name.to_string())
    }

    /// Delete an account. Its attempts are kept.
    pub fn remove(&self, user_id: &str) -> Result<bool> {
        let mut accounts = self.accounts()?;
        let before = accounts.len();
        accounts.retain(|a| a.user.id != user_id);
        if accounts.len() == before {
            return Ok(false);
        }
        self.save(&accounts)?;
        Ok(true)
    }

    fn update(&self, user_id: &str, change: impl FnOnce(&mut User)) -> Result<User> {
        let mut accounts = self.accounts()?;
        let account = accounts
            .iter_mut()
            .find(|a| a.user.id == user_id)
            .ok_or_else(|| DirectoryError::UnknownUser(user_id.to_string()))?;
        change(&mut account.user);
        let user = account.user.clone();
        self.save(&accounts)?;

        let mut current = self.current.lock().unwrap();
        if current.as_ref().is_some_and(|c| c.id == user.id) {
            *current = Some(user.clone());
        }
        Ok(user)
    }
}

impl UserDirectory for StoredDirectory {
    fn current_user(&self) -> Option<User> {
        self.current.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryCollectionStore;

    fn directory() -> StoredDirectory {
        let dir = StoredDirectory::new(Arc::new(MemoryCollectionStore::new()));
        dir.seed([
            Account::new("Administrator", "admin@lms.com", "admin", Role::Admin),
            Account::new("Student One", "student@lms.com", "student", Role::Student),
        ])
        .unwrap();
        dir
    }

    #[test]
    fn sign_in_and_out() {
        let dir = directory();
        assert!(dir.current_user().is_none());

        let user = dir.sign_in(" student@lms.com ", "student").unwrap();
        assert_eq!(user.name, "Student One");
        assert_eq!(dir.current_user().unwrap().id, user.id);

        dir.sign_out();
        assert!(dir.current_user().is_none());
    }

    #[test]
    fn wrong_password_is_rejected() {
        let dir = directory();
        assert_eq!(
            dir.sign_in("student@lms.com", "Student").unwrap_err(),
            DirectoryError::InvalidCredentials
        );
        assert!(dir.current_user().is_none());
    }

    #[test]
    fn disabled_account_cannot_sign_in() {
        let dir = directory();
        let student = dir.find_by_email("student@lms.com").unwrap().unwrap();
        dir.set_active(&student.id, false).unwrap();
        assert_eq!(
            dir.sign_in("student@lms.com", "student").unwrap_err(),
            DirectoryError::AccountDisabled
        );
    }

    #[test]
    fn register_creates_student_at_front() {
        let dir = directory();
        let user = dir.register("New Person", "new@lms.com", "pw").unwrap();
        assert_eq!(user.role, Role::Student);
        assert!(user.id.starts_with("u_"));
        assert_eq!(dir.users().unwrap()[0].email, "new@lms.com");
        assert!(dir.sign_in("new@lms.com", "pw").is_ok());
    }

    #[test]
    fn register_validation() {
        let dir = directory();
        assert_eq!(
            dir.register("", "x@lms.com", "pw").unwrap_err(),
            DirectoryError::MissingField("name")
        );
        assert_eq!(
            dir.register("X", "x@lms.com", "").unwrap_err(),
            DirectoryError::MissingField("password")
        );
        assert!(matches!(
            dir.register("Dup", "admin@lms.com", "pw").unwrap_err(),
            DirectoryError::DuplicateEmail(_)
        ));
    }

    #[test]
    fn role_change_and_rename_update_session() {
        let dir = directory();
        let me = dir.sign_in("student@lms.com", "student").unwrap();
        dir.set_role(&me.id, Role::Admin).unwrap();
        assert_eq!(dir.current_user().unwrap().role, Role::Admin);

        dir.rename_current("Student Prime").unwrap();
        assert_eq!(dir.current_user().unwrap().name, "Student Prime");
        assert_eq!(
            dir.find_by_email("student@lms.com").unwrap().unwrap().name,
            "Student Prime"
        );
    }

    #[test]
    fn remove_account() {
        let dir = directory();
        let admin = dir.find_by_email("admin@lms.com").unwrap().unwrap();
        assert!(dir.remove(&admin.id).unwrap());
        assert!(!dir.remove(&admin.id).unwrap());
        assert_eq!(dir.users().unwrap().len(), 1);
    }

    #[test]
    fn seed_skips_existing_emails() {
        let dir = directory();
        let added = dir
            .seed([Account::new("Again", "admin@lms.com", "x", Role::Admin)])
            .unwrap();
        assert_eq!(added, 0);
    }

    #[test]
    fn stored_layout_keeps_password_beside_user() {
        let account = Account::new("A", "a@lms.com", "pw", Role::Student);
        let value = serde_json::to_value(&account).unwrap();
        assert_eq!(value["email"], "a@lms.com");
        assert_eq!(value["password"], "pw");
        assert_eq!(value["role"], "student");
        assert!(value.get("createdAt").is_some());
    }
}
