use crate::models::User;
use crate::storage::{LocalStorage, CURRENT_USER_KEY};
use tracing::warn;

/// Identity of the signed-in user, passed to everything that is per-user.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: User,
}

impl Session {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    pub fn email(&self) -> &str {
        &self.user.email
    }

    pub fn restore(store: &LocalStorage) -> Option<Self> {
        let raw = store.get_item(CURRENT_USER_KEY)?;
        match serde_json::from_str::<Option<User>>(raw) {
            Ok(user) => user.map(Self::new),
            Err(err) => {
                warn!("discarding unreadable stored session: {err}");
                None
            }
        }
    }

    pub fn persist(&self, store: &mut LocalStorage) -> Result<(), serde_json::Error> {
        store.set_item(CURRENT_USER_KEY, serde_json::to_string(&self.user)?);
        Ok(())
    }

    pub fn teardown(store: &mut LocalStorage) {
        store.remove_item(CURRENT_USER_KEY);
    }
}
