//! # Backend Module
//!
//! Contains all non-UI-framework logic for the rescue animal tracker.
//!
//! The backend follows a layered architecture:
//! ```text
//! Console (menu loop, prompts, tables)
//!     ↓
//! Domain Layer (intake, reservation, inventory, training)
//!     ↓
//! Storage Layer (SQLite repositories, one table per animal kind)
//! ```
//!
//! ## Key Responsibilities
//!
//! - Open the database and make sure both animal tables exist
//! - Build the services and hand them to the console as one [`AppState`]

pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use tracing::info;

use crate::backend::domain::{IntakeService, InventoryService, ReservationService, TrainingService};
use crate::backend::storage::{DbConnection, Repositories};
use crate::config::Config;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub intake_service: IntakeService,
    pub reservation_service: ReservationService,
    pub inventory_service: InventoryService,
    pub training_service: TrainingService,
}

impl AppState {
    pub fn new(repositories: Repositories) -> Self {
        let inventory_service = InventoryService::new(repositories.clone());
        Self {
            intake_service: IntakeService::new(repositories.clone()),
            reservation_service: ReservationService::new(repositories),
            training_service: TrainingService::new(inventory_service.clone()),
            inventory_service,
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &Config) -> Result<AppState> {
    info!("Setting up database at {}", config.database_path.display());
    let db_conn = DbConnection::open(&config.database_path).await?;

    let repositories = Repositories::sqlite(db_conn);
    repositories
        .ensure_schema()
        .await
        .context("Failed to create animal tables")?;

    info!("Setting up application state");
    Ok(AppState::new(repositories))
}
