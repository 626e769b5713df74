//! The link registry: who should be evaluated, and under which name.
//!
//! `LinkRegistry` is the only component that mutates linked users. Lookups
//! that find nothing return `Ok(None)`; absence is the common case, not an
//! error.

use std::sync::Arc;

use tracing::{debug, info};

use super::store::{LinkStore, LinkedUser, StoreError};
use crate::types::UserId;

/// Registry of platform users linked to leaderboard display names.
#[derive(Debug)]
pub struct LinkRegistry<S> {
    store: Arc<S>,
}

impl<S> Clone for LinkRegistry<S> {
    fn clone(&self) -> Self {
        LinkRegistry {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: LinkStore> LinkRegistry<S> {
    pub fn new(store: S) -> Self {
        LinkRegistry {
            store: Arc::new(store),
        }
    }

    /// Links `user_id` to `display_name`, replacing any previous name.
    ///
    /// Returns the stored record.
    pub fn upsert(
        &self,
        user_id: UserId,
        display_name: impl Into<String>,
    ) -> Result<LinkedUser, StoreError> {
        let user = LinkedUser::new(user_id, display_name);
        self.store.upsert(user.clone())?;
        info!(user = %user.user_id, name = %user.display_name, "Linked user");
        Ok(user)
    }

    /// Unlinks `user_id`. Returns the removed record, if there was one.
    pub fn remove(&self, user_id: UserId) -> Result<Option<LinkedUser>, StoreError> {
        let removed = self.store.delete(user_id)?;
        match &removed {
            Some(user) => info!(user = %user_id, name = %user.display_name, "Unlinked user"),
            None => debug!(user = %user_id, "Unlink requested for user that was not linked"),
        }
        Ok(removed)
    }

    pub fn find_by_id(&self, user_id: UserId) -> Result<Option<LinkedUser>, StoreError> {
        self.store.get(user_id)
    }

    pub fn find_by_display_name(&self, name: &str) -> Result<Option<LinkedUser>, StoreError> {
        self.store.get_by_display_name(name)
    }

    /// Every linked user. Order carries no meaning.
    pub fn list_all(&self) -> Result<Vec<LinkedUser>, StoreError> {
        self.store.all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::MemoryLinkStore;

    #[test]
    fn relink_overwrites_name() {
        let registry = LinkRegistry::new(MemoryLinkStore::new());
        registry.upsert(UserId(1), "Zed").unwrap();
        registry.upsert(UserId(1), "Zedd").unwrap();

        let all = registry.list_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].display_name, "Zedd");
    }

    #[test]
    fn absent_lookups_are_none() {
        let registry = LinkRegistry::new(MemoryLinkStore::new());
        assert!(registry.find_by_id(UserId(1)).unwrap().is_none());
        assert!(registry.find_by_display_name("Zed").unwrap().is_none());
        assert!(registry.remove(UserId(1)).unwrap().is_none());
    }

    #[test]
    fn clones_share_the_store() {
        let registry = LinkRegistry::new(MemoryLinkStore::new());
        let other = registry.clone();
        registry.upsert(UserId(4), "Ash").unwrap();
        assert!(other.find_by_display_name("Ash").unwrap().is_some());
    }
}
