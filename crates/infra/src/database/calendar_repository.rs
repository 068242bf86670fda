//! SQLite-backed implementation of the CalendarRepository port.

use std::sync::Arc;

use async_trait::async_trait;
use chairside_core::scheduling::ports::CalendarRepository;
use chairside_domain::{ClinicError, ProviderCalendar, Result};
use chrono::NaiveTime;
use rusqlite::{params, OptionalExtension};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::manager::DbManager;
use crate::errors::InfraError;

/// SQLite implementation of CalendarRepository.
///
/// Working days are stored as a comma-joined day-name string, the format the
/// clinic's provider records have always used.
pub struct SqliteCalendarRepository {
    manager: Arc<DbManager>,
}

impl SqliteCalendarRepository {
    /// Create a new calendar repository
    pub fn new(manager: Arc<DbManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl CalendarRepository for SqliteCalendarRepository {
    #[instrument(skip(self))]
    async fn get(&self, provider_id: Uuid) -> Result<Option<ProviderCalendar>> {
        let conn = self.manager.get()?;

        let row = conn
            .query_row(
                "SELECT provider_id, work_days, work_start, work_end, specialty
                 FROM provider_calendars WHERE provider_id = ?1",
                params![provider_id],
                |row| {
                    Ok((
                        row.get::<_, Uuid>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, NaiveTime>(2)?,
                        row.get::<_, NaiveTime>(3)?,
                        row.get::<_, Option<String>>(4)?,
                    ))
                },
            )
            .optional()
            .map_err(InfraError::from)?;

        let Some((provider_id, raw_days, work_start, work_end, specialty)) = row else {
            return Ok(None);
        };

        let working_days = ProviderCalendar::parse_working_days(&raw_days)
            .map_err(|msg| ClinicError::Database(format!("corrupt calendar row: {msg}")))?;

        Ok(Some(ProviderCalendar { provider_id, working_days, work_start, work_end, specialty }))
    }

    #[instrument(skip(self, calendar), fields(provider_id = %calendar.provider_id))]
    async fn upsert(&self, calendar: &ProviderCalendar) -> Result<()> {
        let conn = self.manager.get()?;

        conn.execute(
            "INSERT INTO provider_calendars (provider_id, work_days, work_start, work_end, specialty)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(provider_id) DO UPDATE SET
                work_days = excluded.work_days,
                work_start = excluded.work_start,
                work_end = excluded.work_end,
                specialty = excluded.specialty",
            params![
                calendar.provider_id,
                calendar.working_days_string(),
                calendar.work_start,
                calendar.work_end,
                calendar.specialty,
            ],
        )
        .map_err(InfraError::from)?;

        debug!("calendar upserted");

        Ok(())
    }
}
