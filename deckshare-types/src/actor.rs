use crate::ActorId;
use serde::{Deserialize, Serialize};

/// The authenticated identity issuing engine operations.
///
/// Supplied by the identity provider; the engine never fabricates one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub id: ActorId,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Actor {
    /// Creates an actor with no display name.
    #[must_use]
    pub fn new(id: impl Into<ActorId>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            display_name: None,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// The name used for fork attribution: display name if set, else email.
    #[must_use]
    pub fn attribution_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}
