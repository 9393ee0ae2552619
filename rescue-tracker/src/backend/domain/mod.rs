//! # Domain Module
//!
//! Business rules of the rescue animal tracker, independent of the console
//! and of SQLite.
//!
//! ## Module Organization
//!
//! - **errors**: the error taxonomy every operation reports through
//! - **intake_service**: validates raw intake lines and stores new records
//! - **reservation_service**: the available/reserved state machine
//! - **inventory_service**: listings and record updates
//! - **training_service**: in-memory FIFO training queue
//!
//! ## Business Rules
//!
//! - Names are unique per kind; a duplicate intake is rejected, never merged
//! - Updates key on the name and never change the reservation flag
//! - Only reserve/unreserve move a record between available and reserved
//! - Reserved animals cannot be queued for training

pub mod errors;
pub mod intake_service;
pub mod inventory_service;
pub mod reservation_service;
pub mod training_service;

pub use errors::*;
pub use intake_service::IntakeService;
pub use inventory_service::{AvailableAnimals, InventoryService};
pub use reservation_service::ReservationService;
pub use training_service::{QueuedAnimal, TrainingService};
