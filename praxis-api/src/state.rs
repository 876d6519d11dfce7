//! Shared Application State
//!
//! One [`AppState`] is built at startup and cloned into every route. It
//! holds a typed [`Collection`] handle per entity, the raw backend for
//! liveness checks, and the optional chat provider. Collection specs are
//! static so handles and the in-memory backend agree on collection names
//! and indexes.

use std::sync::Arc;
use std::time::Instant;

use praxis_core::{Activity, AgentProfile, CoursePackage, InteractionReport, SessionRecord, Unit};
use praxis_llm::ChatProvider;
use praxis_store::{
    Collection, CollectionSpec, DocumentBackend, IndexSpec, MemoryBackend, StoreResult,
};

/// Every collection the backend serves, with the indexes it depends on.
///
/// The compound unique index on reports is what enforces at most one
/// report per (activity_id, user_id, session_id).
pub static COLLECTIONS: [CollectionSpec; 6] = [
    CollectionSpec {
        name: "course_packages",
        indexes: &[IndexSpec {
            name: "course_packages_created_at",
            fields: &["created_at"],
            unique: false,
        }],
    },
    CollectionSpec {
        name: "units",
        indexes: &[IndexSpec {
            name: "units_package_order",
            fields: &["course_package_id", "order"],
            unique: false,
        }],
    },
    CollectionSpec {
        name: "agent_profiles",
        indexes: &[IndexSpec {
            name: "agent_profiles_name",
            fields: &["name"],
            unique: false,
        }],
    },
    CollectionSpec {
        name: "activities",
        indexes: &[IndexSpec {
            name: "activities_start_time",
            fields: &["start_time"],
            unique: false,
        }],
    },
    CollectionSpec {
        name: "sessions",
        indexes: &[IndexSpec {
            name: "sessions_logical_key",
            fields: &["session_id", "generated_at"],
            unique: false,
        }],
    },
    CollectionSpec {
        name: "reports",
        indexes: &[IndexSpec {
            name: "reports_compound_key_unique",
            fields: &["activity_id", "user_id", "session_id"],
            unique: true,
        }],
    },
];

// Positions in COLLECTIONS; keep in sync with the array above.
const COURSE_PACKAGES: usize = 0;
const UNITS: usize = 1;
const AGENT_PROFILES: usize = 2;
const ACTIVITIES: usize = 3;
const SESSIONS: usize = 4;
const REPORTS: usize = 5;

/// Shared state cloned into every route handler.
#[derive(Clone)]
pub struct AppState {
    pub course_packages: Collection<CoursePackage>,
    pub units: Collection<Unit>,
    pub agent_profiles: Collection<AgentProfile>,
    pub activities: Collection<Activity>,
    pub sessions: Collection<SessionRecord>,
    pub reports: Collection<InteractionReport>,

    /// Raw backend handle, used by the connectivity check route.
    pub backend: Arc<dyn DocumentBackend>,

    /// Chat provider; `None` when no credential is configured.
    pub chat: Option<Arc<dyn ChatProvider>>,

    pub start_time: Instant,
}

impl AppState {
    pub fn new(backend: Arc<dyn DocumentBackend>, chat: Option<Arc<dyn ChatProvider>>) -> Self {
        Self {
            course_packages: Collection::new(backend.clone(), &COLLECTIONS[COURSE_PACKAGES]),
            units: Collection::new(backend.clone(), &COLLECTIONS[UNITS]),
            agent_profiles: Collection::new(backend.clone(), &COLLECTIONS[AGENT_PROFILES]),
            activities: Collection::new(backend.clone(), &COLLECTIONS[ACTIVITIES]),
            sessions: Collection::new(backend.clone(), &COLLECTIONS[SESSIONS]),
            reports: Collection::new(backend.clone(), &COLLECTIONS[REPORTS]),
            backend,
            chat,
            start_time: Instant::now(),
        }
    }

    /// Build state over a fresh in-memory backend. Used at startup and
    /// by integration tests.
    pub fn in_memory(chat: Option<Arc<dyn ChatProvider>>) -> Self {
        let backend: Arc<dyn DocumentBackend> = Arc::new(MemoryBackend::new(&COLLECTIONS));
        Self::new(backend, chat)
    }

    /// Idempotently ensure every index of every collection.
    pub async fn ensure_indexes(&self) -> StoreResult<()> {
        self.course_packages.ensure_indexes().await?;
        self.units.ensure_indexes().await?;
        self.agent_profiles.ensure_indexes().await?;
        self.activities.ensure_indexes().await?;
        self.sessions.ensure_indexes().await?;
        self.reports.ensure_indexes().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_positions_match_names() {
        assert_eq!(COLLECTIONS[COURSE_PACKAGES].name, "course_packages");
        assert_eq!(COLLECTIONS[UNITS].name, "units");
        assert_eq!(COLLECTIONS[AGENT_PROFILES].name, "agent_profiles");
        assert_eq!(COLLECTIONS[ACTIVITIES].name, "activities");
        assert_eq!(COLLECTIONS[SESSIONS].name, "sessions");
        assert_eq!(COLLECTIONS[REPORTS].name, "reports");
    }

    #[tokio::test]
    async fn test_ensure_indexes_is_idempotent() {
        let state = AppState::in_memory(None);
        state.ensure_indexes().await.unwrap();
        state.ensure_indexes().await.unwrap();
    }
}
