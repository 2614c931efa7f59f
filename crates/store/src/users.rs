//! In-memory user directory: an entity table of users plus the friend graph.
//!
//! One `RwLock` guards the table, the email index, and the friend graph
//! together. Uniqueness checks and the writes they protect run under the
//! same write guard, and both halves of a mirrored friendship edge change
//! under one guard.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::{Result, StoreError};
use crate::friends::FriendGraph;
use crate::storage::UserStorage;
use crate::table::EntityTable;
use crate::types::{User, UserId};

#[derive(Debug, Default)]
pub struct UserDirectory {
    inner: RwLock<DirectoryInner>,
}

#[derive(Debug, Default)]
struct DirectoryInner {
    users: EntityTable<User>,
    /// Lowercased email -> owning user
    emails: HashMap<String, UserId>,
    friends: FriendGraph,
}

impl DirectoryInner {
    fn email_owner(&self, user: &User) -> Option<UserId> {
        self.emails.get(&user.email_key()).copied()
    }

    /// Resolve ids to records, skipping any that no longer exist
    fn resolve(&self, ids: &[UserId]) -> Vec<User> {
        ids.iter()
            .filter_map(|id| self.users.get(*id).cloned())
            .collect()
    }
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether two users are currently friends
    pub fn are_friends(&self, a: UserId, b: UserId) -> bool {
        self.inner.read().friends.is_friend(a, b)
    }

    /// Number of friendship edges (each pair counted once)
    pub fn friendship_count(&self) -> usize {
        self.inner.read().friends.edge_count()
    }
}

impl UserStorage for UserDirectory {
    fn create(&self, user: User) -> Result<User> {
        let user = user.with_display_name();
        let mut inner = self.inner.write();

        if inner.email_owner(&user).is_some() {
            return Err(StoreError::Conflict(format!(
                "user with email {} already exists",
                user.email
            )));
        }

        let stored = inner.users.insert(user);
        inner.emails.insert(stored.email_key(), stored.id);
        inner.friends.register(stored.id);
        Ok(stored)
    }

    fn update(&self, user: User) -> Result<User> {
        let user = user.with_display_name();
        let mut inner = self.inner.write();

        let previous_key = inner.users.require(user.id)?.email_key();
        if let Some(owner) = inner.email_owner(&user) {
            if owner != user.id {
                return Err(StoreError::Conflict(format!(
                    "email {} is already used by another user",
                    user.email
                )));
            }
        }

        let stored = inner.users.replace(user)?;
        inner.emails.remove(&previous_key);
        inner.emails.insert(stored.email_key(), stored.id);
        Ok(stored)
    }

    fn delete(&self, id: UserId) -> Result<User> {
        let mut inner = self.inner.write();
        let removed = inner.users.remove(id)?;
        inner.emails.remove(&removed.email_key());
        inner.friends.remove_node(id);
        Ok(removed)
    }

    fn find_by_id(&self, id: UserId) -> Option<User> {
        self.inner.read().users.get(id).cloned()
    }

    fn find_all(&self) -> Vec<User> {
        self.inner.read().users.snapshot()
    }

    fn add_friend(&self, user_id: UserId, friend_id: UserId) -> Result<()> {
        if user_id == friend_id {
            return Err(StoreError::Validation(format!(
                "user {} cannot befriend themselves",
                user_id
            )));
        }

        let mut inner = self.inner.write();
        inner.users.require(user_id)?;
        inner.users.require(friend_id)?;
        inner.friends.connect(user_id, friend_id);
        Ok(())
    }

    fn remove_friend(&self, user_id: UserId, friend_id: UserId) -> Result<()> {
        let mut inner = self.inner.write();
        inner.users.require(user_id)?;
        inner.users.require(friend_id)?;
        inner.friends.disconnect(user_id, friend_id);
        Ok(())
    }

    fn friend_ids(&self, user_id: UserId) -> Result<Vec<UserId>> {
        let inner = self.inner.read();
        inner.users.require(user_id)?;
        Ok(inner.friends.friends_of(user_id))
    }

    fn friends(&self, user_id: UserId) -> Result<Vec<User>> {
        let inner = self.inner.read();
        inner.users.require(user_id)?;
        let ids = inner.friends.friends_of(user_id);
        Ok(inner.resolve(&ids))
    }

    fn common_friends(&self, user_id: UserId, other_id: UserId) -> Result<Vec<User>> {
        let inner = self.inner.read();
        inner.users.require(user_id)?;
        inner.users.require(other_id)?;
        let ids = inner.friends.common(user_id, other_id);
        Ok(inner.resolve(&ids))
    }

    fn len(&self) -> usize {
        self.inner.read().users.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use chrono::NaiveDate;

    fn user(email: &str, login: &str) -> User {
        User::new(email, login, "", NaiveDate::from_ymd_opt(1990, 6, 1).unwrap())
    }

    fn directory_with(n: usize) -> (UserDirectory, Vec<User>) {
        let directory = UserDirectory::new();
        let users = (0..n)
            .map(|i| {
                directory
                    .create(user(&format!("user{i}@mail.test"), &format!("user{i}")))
                    .unwrap()
            })
            .collect();
        (directory, users)
    }

    #[test]
    fn test_create_assigns_ids_and_defaults_name() {
        let (_, users) = directory_with(2);
        assert_eq!(users[0].id, 1);
        assert_eq!(users[1].id, 2);
        assert_eq!(users[0].name, "user0");
    }

    #[test]
    fn test_duplicate_email_ignores_case() {
        let directory = UserDirectory::new();
        directory.create(user("Ash@Mail.test", "ash")).unwrap();

        let err = directory.create(user("ash@mail.TEST", "ash2")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(directory.len(), 1);
    }

    #[test]
    fn test_update_own_email_is_not_a_conflict() {
        let directory = UserDirectory::new();
        let mut ash = directory.create(user("ash@mail.test", "ash")).unwrap();

        ash.email = "ASH@mail.test".to_string();
        ash.name = "Science Officer".to_string();
        let updated = directory.update(ash.clone()).unwrap();
        assert_eq!(updated, ash);
    }

    #[test]
    fn test_update_to_other_users_email_conflicts() {
        let (directory, users) = directory_with(2);
        let mut second = users[1].clone();
        second.email = users[0].email.to_uppercase();

        let err = directory.update(second).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(directory.find_by_id(2), Some(users[1].clone()));
    }

    #[test]
    fn test_update_frees_previous_email() {
        let (directory, users) = directory_with(1);
        let mut first = users[0].clone();
        let old_email = first.email.clone();
        first.email = "renamed@mail.test".to_string();
        directory.update(first).unwrap();

        assert!(directory.create(user(&old_email, "reuse")).is_ok());
    }

    #[test]
    fn test_update_missing_user() {
        let directory = UserDirectory::new();
        let mut ghost = user("ghost@mail.test", "ghost");
        ghost.id = 42;
        assert_eq!(
            directory.update(ghost),
            Err(StoreError::not_found("user", 42))
        );
    }

    #[test]
    fn test_update_blank_name_defaults_to_login() {
        let (directory, users) = directory_with(1);
        let mut first = users[0].clone();
        first.name = String::new();
        first.login = "newlogin".to_string();
        assert_eq!(directory.update(first).unwrap().name, "newlogin");
    }

    #[test]
    fn test_self_friendship_rejected_even_for_unknown_id() {
        let (directory, _) = directory_with(1);
        assert_eq!(directory.add_friend(1, 1).unwrap_err().kind(), ErrorKind::Validation);
        assert_eq!(directory.add_friend(77, 77).unwrap_err().kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_add_friend_requires_both_users() {
        let (directory, _) = directory_with(1);
        assert_eq!(
            directory.add_friend(1, 5),
            Err(StoreError::not_found("user", 5))
        );
        assert_eq!(
            directory.add_friend(5, 1),
            Err(StoreError::not_found("user", 5))
        );
        assert_eq!(directory.friendship_count(), 0);
    }

    #[test]
    fn test_friendship_is_symmetric() {
        let (directory, _) = directory_with(2);
        directory.add_friend(1, 2).unwrap();
        directory.add_friend(1, 2).unwrap();

        assert_eq!(directory.friend_ids(1).unwrap(), vec![2]);
        assert_eq!(directory.friend_ids(2).unwrap(), vec![1]);
        assert_eq!(directory.friendship_count(), 1);

        directory.remove_friend(2, 1).unwrap();
        assert!(directory.friends(1).unwrap().is_empty());
        assert!(directory.friends(2).unwrap().is_empty());

        // Removing a non-edge is fine
        directory.remove_friend(1, 2).unwrap();
    }

    #[test]
    fn test_friends_of_missing_user() {
        let directory = UserDirectory::new();
        assert_eq!(
            directory.friends(3).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_common_friends() {
        let (directory, users) = directory_with(4);
        directory.add_friend(1, 3).unwrap();
        directory.add_friend(2, 3).unwrap();
        directory.add_friend(1, 4).unwrap();

        assert_eq!(directory.common_friends(1, 2).unwrap(), vec![users[2].clone()]);
        assert!(directory.common_friends(3, 4).unwrap().contains(&users[0]));
        assert!(directory.common_friends(2, 4).unwrap().is_empty());
        assert_eq!(
            directory.common_friends(1, 9).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_delete_cascades_friendships() {
        let (directory, _) = directory_with(3);
        directory.add_friend(1, 2).unwrap();
        directory.add_friend(1, 3).unwrap();

        directory.delete(1).unwrap();

        assert!(directory.friends(2).unwrap().is_empty());
        assert!(directory.friends(3).unwrap().is_empty());
        assert!(!directory.are_friends(2, 1));
        assert_eq!(directory.delete(1).unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_delete_releases_email_but_not_id() {
        let (directory, users) = directory_with(2);
        directory.delete(2).unwrap();

        let again = directory.create(user(&users[1].email, "again")).unwrap();
        assert_eq!(again.id, 3);
    }
}
