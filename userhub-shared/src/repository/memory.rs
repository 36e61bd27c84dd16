/// In-memory user repository
///
/// Keeps users in a `BTreeMap` behind a tokio `RwLock`. IDs are assigned
/// sequentially starting at 1. `seed` inserts fixtures with explicit IDs and
/// moves the sequence past them.

use super::{RepositoryError, UserRepository};
use crate::models::user::{NewUser, User, UserStatus, UserUpdate};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Store {
    users: BTreeMap<i64, User>,
    next_id: i64,
}

impl Store {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

/// Process-local user repository
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryUserRepository {
    /// Creates an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts users with their IDs as given
    ///
    /// # Errors
    ///
    /// `DuplicateEmail` if a seeded email collides with an existing user
    pub async fn seed<I>(&self, users: I) -> Result<(), RepositoryError>
    where
        I: IntoIterator<Item = User>,
    {
        let mut store = self.store.write().await;
        for user in users {
            if store.email_taken(&user.email, Some(user.id)) {
                return Err(RepositoryError::DuplicateEmail(user.email));
            }
            store.next_id = store.next_id.max(user.id);
            store.users.insert(user.id, user);
        }
        Ok(())
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.store.read().await.users.len()
    }

    /// Whether the repository holds no users
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.users.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError> {
        Ok(self.store.read().await.users.get(&id).cloned())
    }

    async fn find_by_id_and_status(
        &self,
        id: i64,
        status: UserStatus,
    ) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .store
            .read()
            .await
            .users
            .get(&id)
            .filter(|u| u.status == status)
            .cloned())
    }

    async fn find_by_email_and_status(
        &self,
        email: &str,
        status: UserStatus,
    ) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .store
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == email && u.status == status)
            .cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut store = self.store.write().await;
        if store.email_taken(&user.email, None) {
            return Err(RepositoryError::DuplicateEmail(user.email));
        }

        store.next_id += 1;
        let user = User {
            id: store.next_id,
            email: user.email,
            nickname: user.nickname,
            address: user.address,
            certification_code: user.certification_code,
            status: user.status,
            last_login_at: None,
        };
        store.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn save(&self, user: &User) -> Result<User, RepositoryError> {
        let mut store = self.store.write().await;
        if !store.users.contains_key(&user.id) {
            return Err(RepositoryError::NotFound(user.id));
        }
        if store.email_taken(&user.email, Some(user.id)) {
            return Err(RepositoryError::DuplicateEmail(user.email.clone()));
        }

        store.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn update_profile(
        &self,
        id: i64,
        update: &UserUpdate,
    ) -> Result<Option<User>, RepositoryError> {
        let mut store = self.store.write().await;
        Ok(store
            .users
            .get_mut(&id)
            .filter(|u| u.is_active())
            .map(|user| {
                user.apply_update(update);
                user.clone()
            }))
    }

    async fn record_login(&self, id: i64, at_millis: i64) -> Result<Option<User>, RepositoryError> {
        let mut store = self.store.write().await;
        Ok(store
            .users
            .get_mut(&id)
            .filter(|u| u.is_active())
            .map(|user| {
                user.touch_login(at_millis);
                user.clone()
            }))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            nickname: "bob".to_string(),
            address: None,
            certification_code: "code".to_string(),
            status: UserStatus::Pending,
        }
    }

    fn fixture(id: i64, email: &str, status: UserStatus) -> User {
        User {
            id,
            email: email.to_string(),
            nickname: "bob".to_string(),
            address: None,
            certification_code: "code".to_string(),
            status,
            last_login_at: None,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let repo = InMemoryUserRepository::new();
        let first = repo.insert(new_user("a@example.com")).await.unwrap();
        let second = repo.insert(new_user("b@example.com")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn test_insert_duplicate_email() {
        let repo = InMemoryUserRepository::new();
        repo.insert(new_user("a@example.com")).await.unwrap();

        let err = repo.insert(new_user("a@example.com")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::DuplicateEmail(email) if email == "a@example.com"));
    }

    #[tokio::test]
    async fn test_seed_moves_sequence_past_fixtures() {
        let repo = InMemoryUserRepository::new();
        repo.seed([fixture(10, "a@example.com", UserStatus::Active)])
            .await
            .unwrap();

        let inserted = repo.insert(new_user("b@example.com")).await.unwrap();
        assert_eq!(inserted.id, 11);
    }

    #[tokio::test]
    async fn test_status_filtered_lookups() {
        let repo = InMemoryUserRepository::new();
        repo.seed([
            fixture(1, "active@example.com", UserStatus::Active),
            fixture(2, "pending@example.com", UserStatus::Pending),
        ])
        .await
        .unwrap();

        assert!(repo
            .find_by_id_and_status(1, UserStatus::Active)
            .await
            .unwrap()
            .is_some());
        assert!(repo
            .find_by_id_and_status(1, UserStatus::Pending)
            .await
            .unwrap()
            .is_none());
        assert!(repo
            .find_by_id_and_status(-1, UserStatus::Active)
            .await
            .unwrap()
            .is_none());

        let found = repo
            .find_by_email_and_status("active@example.com", UserStatus::Active)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, 1);
        assert!(repo
            .find_by_email_and_status("pending@example.com", UserStatus::Active)
            .await
            .unwrap()
            .is_none());

        // Unfiltered lookup still sees pending users
        assert!(repo.find_by_id(2).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_save_updates_and_rejects_unknown() {
        let repo = InMemoryUserRepository::new();
        let mut user = repo.insert(new_user("a@example.com")).await.unwrap();

        user.nickname = "pool".to_string();
        repo.save(&user).await.unwrap();
        assert_eq!(repo.find_by_id(user.id).await.unwrap().unwrap().nickname, "pool");

        let ghost = fixture(99, "ghost@example.com", UserStatus::Active);
        let err = repo.save(&ghost).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(99)));
    }

    #[tokio::test]
    async fn test_targeted_updates_touch_only_their_columns() {
        let repo = InMemoryUserRepository::new();
        repo.seed([
            fixture(1, "active@example.com", UserStatus::Active),
            fixture(2, "pending@example.com", UserStatus::Pending),
        ])
        .await
        .unwrap();

        // A login read before the profile change must not undo it
        let stale = repo.find_by_id(1).await.unwrap().unwrap();
        repo.update_profile(
            1,
            &UserUpdate {
                nickname: Some("pool".to_string()),
                address: None,
            },
        )
        .await
        .unwrap()
        .unwrap();
        let logged_in = repo.record_login(stale.id, 42).await.unwrap().unwrap();

        assert_eq!(logged_in.nickname, "pool");
        assert_eq!(logged_in.last_login_at, Some(42));

        assert!(repo
            .update_profile(2, &UserUpdate::default())
            .await
            .unwrap()
            .is_none());
        assert!(repo.record_login(2, 42).await.unwrap().is_none());
        assert!(repo.record_login(99, 42).await.unwrap().is_none());
    }
}
