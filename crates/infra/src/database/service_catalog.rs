//! SQLite-backed implementation of the ServiceCatalog port.

use std::sync::Arc;

use async_trait::async_trait;
use chairside_core::scheduling::ports::ServiceCatalog;
use chairside_domain::Result;
use rusqlite::{params, OptionalExtension, TransactionBehavior};
use tracing::instrument;

use super::manager::DbManager;
use crate::errors::InfraError;

/// SQLite implementation of ServiceCatalog.
///
/// A price entry may be scoped to a provider specialty; lookups prefer the
/// scoped entry and fall back to the unscoped one.
pub struct SqliteServiceCatalog {
    manager: Arc<DbManager>,
}

impl SqliteServiceCatalog {
    /// Create a new service catalog
    pub fn new(manager: Arc<DbManager>) -> Self {
        Self { manager }
    }

    /// Create or replace a price entry. `specialty = None` sets the
    /// unscoped fallback price for the service.
    #[instrument(skip(self))]
    pub async fn set_price(
        &self,
        service_name: &str,
        specialty: Option<&str>,
        price: f64,
    ) -> Result<()> {
        let mut conn = self.manager.get()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(InfraError::from)?;

        // Manual upsert: NULL specialties never match an ON CONFLICT target.
        let changed = tx
            .execute(
                "UPDATE service_catalog SET price = ?1
                 WHERE service_name = ?2 AND specialty IS ?3",
                params![price, service_name, specialty],
            )
            .map_err(InfraError::from)?;
        if changed == 0 {
            tx.execute(
                "INSERT INTO service_catalog (service_name, specialty, price)
                 VALUES (?1, ?2, ?3)",
                params![service_name, specialty, price],
            )
            .map_err(InfraError::from)?;
        }

        tx.commit().map_err(InfraError::from)?;
        Ok(())
    }
}

#[async_trait]
impl ServiceCatalog for SqliteServiceCatalog {
    #[instrument(skip(self))]
    async fn price_of(
        &self,
        service_name: &str,
        specialty: Option<&str>,
    ) -> Result<Option<f64>> {
        let conn = self.manager.get()?;

        let price = conn
            .query_row(
                "SELECT price FROM service_catalog
                 WHERE service_name = ?1 AND (specialty = ?2 OR specialty IS NULL)
                 ORDER BY (specialty IS NULL) ASC
                 LIMIT 1",
                params![service_name, specialty],
                |row| row.get::<_, f64>(0),
            )
            .optional()
            .map_err(InfraError::from)?;

        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Arc<DbManager>, tempfile::TempDir) {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let manager = Arc::new(DbManager::new(temp_dir.path().join("test.db"), 2).unwrap());
        manager.run_migrations().unwrap();
        (manager, temp_dir)
    }

    #[tokio::test]
    async fn specialty_scoped_price_wins_over_fallback() {
        let (manager, _temp) = setup();
        let catalog = SqliteServiceCatalog::new(manager);

        catalog.set_price("Tooth Extraction", None, 800.0).await.unwrap();
        catalog.set_price("Tooth Extraction", Some("Oral Surgery"), 1500.0).await.unwrap();

        let scoped = catalog.price_of("Tooth Extraction", Some("Oral Surgery")).await.unwrap();
        assert_eq!(scoped, Some(1500.0));

        // Specialties without a scoped entry get the fallback row.
        let fallback =
            catalog.price_of("Tooth Extraction", Some("General Dentistry")).await.unwrap();
        assert_eq!(fallback, Some(800.0));

        let unscoped = catalog.price_of("Tooth Extraction", None).await.unwrap();
        assert_eq!(unscoped, Some(800.0));

        assert_eq!(catalog.price_of("Braces", None).await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_price_replaces_existing_entries() {
        let (manager, _temp) = setup();
        let catalog = SqliteServiceCatalog::new(manager);

        catalog.set_price("Dental Checkup", None, 500.0).await.unwrap();
        catalog.set_price("Dental Checkup", None, 650.0).await.unwrap();

        assert_eq!(catalog.price_of("Dental Checkup", None).await.unwrap(), Some(650.0));
    }
}
