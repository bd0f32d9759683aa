//! Public alias record: maps a shareable id to the owning account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Index entry written alongside every saved invitation.
///
/// `owner_id` is kept as raw text because records migrated from the hosted
/// store may carry a missing, empty or foreign owner reference; all of those
/// resolve to "not found".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicInvitation {
    pub id: String,
    #[serde(default)]
    pub owner_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl PublicInvitation {
    pub fn new(id: impl Into<String>, owner_id: Uuid) -> Self {
        Self {
            id: id.into(),
            owner_id: Some(owner_id.to_string()),
            updated_at: Utc::now(),
        }
    }

    /// Owner reference, if present and well-formed.
    pub fn owner(&self) -> Option<Uuid> {
        self.owner_id
            .as_deref()
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .and_then(|o| Uuid::parse_str(o).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_parsing() {
        let owner = Uuid::new_v4();
        assert_eq!(PublicInvitation::new("abc", owner).owner(), Some(owner));

        let mut record = PublicInvitation::new("abc", owner);
        record.owner_id = None;
        assert_eq!(record.owner(), None);
        record.owner_id = Some("   ".into());
        assert_eq!(record.owner(), None);
        record.owner_id = Some("firebase-uid-123".into());
        assert_eq!(record.owner(), None);
    }
}
