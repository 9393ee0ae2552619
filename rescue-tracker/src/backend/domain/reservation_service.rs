use shared::{AnimalKind, AnimalRecord, ReservationState};
use tracing::info;

use crate::backend::domain::errors::{RescueError, RescueResult};
use crate::backend::storage::Repositories;

/// Service that moves records between the available and reserved states.
///
/// Transitions are permissive: reserving a reserved animal (or releasing an
/// available one) succeeds and leaves the flag where it was.
#[derive(Clone)]
pub struct ReservationService {
    repositories: Repositories,
}

impl ReservationService {
    pub fn new(repositories: Repositories) -> Self {
        Self { repositories }
    }

    /// Animals of `kind` that can currently be reserved
    pub async fn list_reservable(&self, kind: AnimalKind) -> RescueResult<Vec<AnimalRecord>> {
        let records = self.repositories.for_kind(kind).fetch_available().await?;
        info!("Found {} reservable {}", records.len(), kind.plural());
        Ok(records)
    }

    /// Animals of `kind` that are currently reserved
    pub async fn list_releasable(&self, kind: AnimalKind) -> RescueResult<Vec<AnimalRecord>> {
        let records = self.repositories.for_kind(kind).fetch_unavailable().await?;
        info!("Found {} reserved {}", records.len(), kind.plural());
        Ok(records)
    }

    pub async fn reserve(&self, kind: AnimalKind, id: i64) -> RescueResult<AnimalRecord> {
        self.transition(kind, id, ReservationState::Reserved).await
    }

    pub async fn unreserve(&self, kind: AnimalKind, id: i64) -> RescueResult<AnimalRecord> {
        self.transition(kind, id, ReservationState::Available).await
    }

    async fn transition(
        &self,
        kind: AnimalKind,
        id: i64,
        target: ReservationState,
    ) -> RescueResult<AnimalRecord> {
        let repository = self.repositories.for_kind(kind);

        let current = match repository.fetch_by_id(id).await? {
            Some(record) => record,
            None => {
                info!("Cannot mark {} {} as {}: not found", kind, id, target);
                return Err(RescueError::not_found_id(kind, id));
            }
        };

        if current.reservation_state() == target {
            info!("{} '{}' is already {}", kind, current.name, target);
        }

        repository.set_reserved(id, target.is_reserved()).await?;

        let updated = repository
            .fetch_by_id(id)
            .await?
            .ok_or_else(|| RescueError::not_found_id(kind, id))?;

        info!("{} '{}' (ID {}) is now {}", kind, updated.name, id, target);
        Ok(updated)
    }
}
