use shared::{AnimalKind, AnimalRecord};
use tracing::info;

use crate::backend::domain::errors::{RescueError, RescueResult};
use crate::backend::storage::Repositories;

/// Available animals of every kind
#[derive(Debug, Clone, Default)]
pub struct AvailableAnimals {
    pub dogs: Vec<AnimalRecord>,
    pub monkeys: Vec<AnimalRecord>,
}

impl AvailableAnimals {
    pub fn of_kind(&self, kind: AnimalKind) -> &[AnimalRecord] {
        match kind {
            AnimalKind::Dog => &self.dogs,
            AnimalKind::Monkey => &self.monkeys,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dogs.is_empty() && self.monkeys.is_empty()
    }
}

/// Service for listing and maintaining stored records
#[derive(Clone)]
pub struct InventoryService {
    repositories: Repositories,
}

impl InventoryService {
    pub fn new(repositories: Repositories) -> Self {
        Self { repositories }
    }

    /// Every record of `kind`, in intake order
    pub async fn list(&self, kind: AnimalKind) -> RescueResult<Vec<AnimalRecord>> {
        info!("Listing all {}", kind.plural());
        let records = self.repositories.for_kind(kind).fetch_all().await?;
        info!("Found {} {}", records.len(), kind.plural());
        Ok(records)
    }

    /// Every animal that is not reserved, grouped by kind
    pub async fn list_available(&self) -> RescueResult<AvailableAnimals> {
        info!("Listing available animals");
        let available = AvailableAnimals {
            dogs: self.repositories.for_kind(AnimalKind::Dog).fetch_available().await?,
            monkeys: self.repositories.for_kind(AnimalKind::Monkey).fetch_available().await?,
        };
        info!(
            "Found {} available dogs and {} available monkeys",
            available.dogs.len(),
            available.monkeys.len()
        );
        Ok(available)
    }

    pub async fn find_by_name(&self, kind: AnimalKind, name: &str) -> RescueResult<AnimalRecord> {
        self.repositories
            .for_kind(kind)
            .fetch_by_name(name)
            .await?
            .ok_or_else(|| RescueError::not_found_name(kind, name))
    }

    /// Persist changed non-identity fields of an existing record
    pub async fn update(&self, record: &AnimalRecord) -> RescueResult<()> {
        info!("Updating {} '{}'", record.kind(), record.name);
        self.repositories.for_kind(record.kind()).update(record).await
    }
}
