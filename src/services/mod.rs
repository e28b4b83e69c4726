//! Business logic services

pub mod catalog;
pub mod directory;
pub mod ledger;
pub mod views;

use crate::{config::CirculationConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub directory: directory::DirectoryService,
    pub ledger: ledger::LedgerService,
    pub views: views::ViewsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, circulation: CirculationConfig) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            directory: directory::DirectoryService::new(repository.clone()),
            ledger: ledger::LedgerService::new(repository.clone(), circulation),
            views: views::ViewsService::new(repository),
        }
    }
}
