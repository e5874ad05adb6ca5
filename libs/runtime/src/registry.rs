//! Actor Registry
//!
//! Instance-scoped mapping from message type to actor. Crate-private: the
//! runtime is the only way to reach an actor.

use crate::actor::Actor;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Type-keyed actor lookup owned by a single runtime
#[derive(Default)]
pub(crate) struct ActorRegistry {
    actors: RwLock<HashMap<String, Arc<dyn Actor>>>,
}

impl ActorRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Upsert the actor for `message_type`. Returns true if an earlier
    /// registration was replaced.
    pub(crate) fn register(&self, message_type: String, actor: Arc<dyn Actor>) -> bool {
        self.actors.write().insert(message_type, actor).is_some()
    }

    /// Find the actor for `message_type`.
    ///
    /// The returned handle is cloned out so no lock is held while the
    /// actor runs.
    pub(crate) fn find(&self, message_type: &str) -> Option<Arc<dyn Actor>> {
        self.actors.read().get(message_type).cloned()
    }

    pub(crate) fn len(&self) -> usize {
        self.actors.read().len()
    }
}

impl std::fmt::Debug for ActorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<String> = self.actors.read().keys().cloned().collect();
        types.sort();
        f.debug_struct("ActorRegistry").field("types", &types).finish()
    }
}
