use serde::{Deserialize, Serialize};

use crate::common::{Identifiable, Record, RecordId, UserId};

pub const ADMIN_USER_ID: UserId = UserId(1);

/// Operator allowed to create journal entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: RecordId,
    pub user_name: String,
    pub role: String,
    #[serde(default = "User::default_active")]
    pub is_active: bool,
}

impl User {
    pub fn admin() -> Self {
        Self {
            id: ADMIN_USER_ID.0,
            user_name: "admin".into(),
            role: "Administrator".into(),
            is_active: true,
        }
    }

    pub fn user_id(&self) -> UserId {
        UserId(self.id)
    }

    pub fn default_active() -> bool {
        true
    }
}

impl Identifiable for User {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Record for User {}
