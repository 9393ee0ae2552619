pub mod animal_repository;

pub use animal_repository::AnimalRepository;

use shared::AnimalKind;
use std::sync::Arc;

use crate::backend::domain::errors::RescueResult;
use crate::backend::storage::connection::DbConnection;
use crate::backend::storage::traits::AnimalStorage;

/// One repository per animal kind, handed to every service that needs storage
#[derive(Clone)]
pub struct Repositories {
    dogs: Arc<dyn AnimalStorage>,
    monkeys: Arc<dyn AnimalStorage>,
}

impl Repositories {
    pub fn new(dogs: Arc<dyn AnimalStorage>, monkeys: Arc<dyn AnimalStorage>) -> Self {
        Self { dogs, monkeys }
    }

    /// SQLite repositories for both tables sharing one connection
    pub fn sqlite(db: DbConnection) -> Self {
        Self::new(
            Arc::new(AnimalRepository::new(db.clone(), AnimalKind::Dog)),
            Arc::new(AnimalRepository::new(db, AnimalKind::Monkey)),
        )
    }

    pub fn for_kind(&self, kind: AnimalKind) -> &dyn AnimalStorage {
        match kind {
            AnimalKind::Dog => self.dogs.as_ref(),
            AnimalKind::Monkey => self.monkeys.as_ref(),
        }
    }

    /// Create every table that does not exist yet
    pub async fn ensure_schema(&self) -> RescueResult<()> {
        for kind in AnimalKind::ALL {
            self.for_kind(kind).ensure_schema().await?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub async fn init_test() -> anyhow::Result<Self> {
        let repositories = Self::sqlite(DbConnection::init_test().await?);
        repositories.ensure_schema().await?;
        Ok(repositories)
    }
}
