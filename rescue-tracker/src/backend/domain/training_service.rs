use shared::{AnimalKind, AnimalRecord, TrainingStatus};
use std::collections::VecDeque;
use tracing::info;

use crate::backend::domain::errors::{RescueResult, ValidationError};
use crate::backend::domain::inventory_service::InventoryService;

/// An animal waiting for training, addressed by its unique name
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedAnimal {
    pub kind: AnimalKind,
    pub name: String,
}

/// First-in, first-out training queue kept in memory for the session
#[derive(Clone)]
pub struct TrainingService {
    inventory: InventoryService,
    queue: VecDeque<QueuedAnimal>,
}

impl TrainingService {
    pub fn new(inventory: InventoryService) -> Self {
        Self {
            inventory,
            queue: VecDeque::new(),
        }
    }

    /// Put an existing, unreserved animal at the back of the queue
    pub async fn enqueue(&mut self, kind: AnimalKind, name: &str) -> RescueResult<AnimalRecord> {
        let record = self.inventory.find_by_name(kind, name).await?;

        if record.reserved {
            info!("Refusing to queue reserved {} '{}'", kind, name);
            return Err(ValidationError::ReservedForService {
                name: record.name,
            }
            .into());
        }

        if self.position(kind, name).is_some() {
            return Err(ValidationError::AlreadyQueued {
                name: record.name,
            }
            .into());
        }

        self.queue.push_back(QueuedAnimal {
            kind,
            name: record.name.clone(),
        });
        info!(
            "Queued {} '{}' for training ({} waiting)",
            kind,
            record.name,
            self.queue.len()
        );
        Ok(record)
    }

    /// Train the animal at the front of the queue and persist its new status.
    ///
    /// Returns `Ok(None)` when nobody is waiting. The entry is consumed even
    /// if the update fails.
    pub async fn train_next(&mut self) -> RescueResult<Option<AnimalRecord>> {
        let Some(next) = self.queue.pop_front() else {
            info!("No animals available for training");
            return Ok(None);
        };

        let mut record = self.inventory.find_by_name(next.kind, &next.name).await?;
        record.training_status = TrainingStatus::Trained;
        self.inventory.update(&record).await?;

        info!("Trained {} '{}'", next.kind, record.name);
        Ok(Some(record))
    }

    /// Drop the animal at the front of the queue without training it
    pub fn skip_next(&mut self) -> Option<QueuedAnimal> {
        let skipped = self.queue.pop_front();
        if let Some(animal) = &skipped {
            info!("Skipped training for {} '{}'", animal.kind, animal.name);
        }
        skipped
    }

    pub fn peek(&self) -> Option<&QueuedAnimal> {
        self.queue.front()
    }

    /// Waiting animals, front of the queue first
    pub fn pending(&self) -> impl Iterator<Item = &QueuedAnimal> {
        self.queue.iter()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    fn position(&self, kind: AnimalKind, name: &str) -> Option<usize> {
        self.queue
            .iter()
            .position(|queued| queued.kind == kind && queued.name == name)
    }
}
