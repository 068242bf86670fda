//! SQLite-backed implementation of the AppointmentRepository port.
//!
//! The create-if-free commit leans on the partial unique index over
//! slot-occupying statuses, so two concurrent inserts for one tuple can
//! never both succeed. Lifecycle transitions are single guarded UPDATEs
//! inside immediate transactions.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chairside_core::scheduling::ports::{
    AppointmentRepository, PaymentOutcome, SlotClaim, TransitionOutcome,
};
use chairside_domain::{Appointment, AppointmentStatus, PaymentStatus, Result};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, ToSql, TransactionBehavior};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::manager::DbManager;
use crate::errors::InfraError;

const APPOINTMENT_COLUMNS: &str = "id, patient_id, provider_id, date, time, service_name, \
     service_price, status, payment_status, payment_method, notes, created_at";

/// SQLite implementation of AppointmentRepository
pub struct SqliteAppointmentRepository {
    manager: Arc<DbManager>,
}

impl SqliteAppointmentRepository {
    /// Create a new appointment repository
    pub fn new(manager: Arc<DbManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl AppointmentRepository for SqliteAppointmentRepository {
    #[instrument(skip(self))]
    async fn occupied_times(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<NaiveTime>> {
        let conn = self.manager.get()?;

        // Status list must match the idx_appointments_active_slot predicate.
        let mut stmt = conn
            .prepare(
                "SELECT time FROM appointments
                 WHERE provider_id = ?1 AND date = ?2
                   AND status IN ('Pending', 'Scheduled', 'Confirmed')
                 ORDER BY time ASC",
            )
            .map_err(InfraError::from)?;

        let times = stmt
            .query_map(params![provider_id, date], |row| row.get::<_, NaiveTime>(0))
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;

        debug!(%provider_id, %date, count = times.len(), "fetched occupancy snapshot");

        Ok(times)
    }

    #[instrument(skip(self, appointment), fields(appointment_id = %appointment.id))]
    async fn insert_if_free(&self, appointment: &Appointment) -> Result<SlotClaim> {
        let conn = self.manager.get()?;

        let result = conn.execute(
            "INSERT INTO appointments (
                id, patient_id, provider_id, date, time, service_name,
                service_price, status, payment_status, payment_method, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                appointment.id,
                appointment.patient_id,
                appointment.provider_id,
                appointment.date,
                appointment.time,
                appointment.service_name,
                appointment.service_price,
                appointment.status.as_str(),
                appointment.payment_status.as_str(),
                appointment.payment_method,
                appointment.notes,
                appointment.created_at,
            ],
        );

        match result {
            Ok(_) => {
                debug!("appointment row created");
                Ok(SlotClaim::Created)
            }
            Err(err) if is_unique_violation(&err) => {
                debug!("slot already held by a concurrent or earlier booking");
                Ok(SlotClaim::Conflict)
            }
            Err(err) => Err(InfraError::from(err).into()),
        }
    }

    #[instrument(skip(self))]
    async fn find(&self, id: Uuid) -> Result<Option<Appointment>> {
        let conn = self.manager.get()?;

        let row = conn
            .query_row(
                &format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1"),
                params![id],
                row_to_appointment,
            )
            .optional()
            .map_err(InfraError::from)?;

        Ok(row)
    }

    #[instrument(skip(self, notes), fields(to = %to))]
    async fn transition(
        &self,
        id: Uuid,
        allowed_from: &[AppointmentStatus],
        to: AppointmentStatus,
        notes: Option<String>,
    ) -> Result<TransitionOutcome> {
        let mut conn = self.manager.get()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(InfraError::from)?;

        let placeholders = vec!["?"; allowed_from.len()].join(", ");
        let sql = format!(
            "UPDATE appointments SET status = ?, notes = COALESCE(?, notes)
             WHERE id = ? AND status IN ({placeholders})"
        );

        let to_str = to.as_str();
        let mut sql_params: Vec<&dyn ToSql> = vec![&to_str, &notes, &id];
        let from_strs: Vec<&str> = allowed_from.iter().map(|status| status.as_str()).collect();
        for status in &from_strs {
            sql_params.push(status);
        }

        let changed = tx.execute(&sql, sql_params.as_slice()).map_err(InfraError::from)?;

        let row = tx
            .query_row(
                &format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1"),
                params![id],
                row_to_appointment,
            )
            .optional()
            .map_err(InfraError::from)?;

        tx.commit().map_err(InfraError::from)?;

        Ok(match (changed, row) {
            (_, None) => TransitionOutcome::NotFound,
            (0, Some(current)) => TransitionOutcome::Refused(current.status),
            (_, Some(updated)) => TransitionOutcome::Applied(updated),
        })
    }

    #[instrument(skip(self, method))]
    async fn record_payment(&self, id: Uuid, method: &str) -> Result<PaymentOutcome> {
        let mut conn = self.manager.get()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(InfraError::from)?;

        let changed = tx
            .execute(
                "UPDATE appointments SET payment_status = ?1, payment_method = ?2
                 WHERE id = ?3 AND payment_status = ?4",
                params![
                    PaymentStatus::Paid.as_str(),
                    method,
                    id,
                    PaymentStatus::Unpaid.as_str()
                ],
            )
            .map_err(InfraError::from)?;

        let row = tx
            .query_row(
                &format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1"),
                params![id],
                row_to_appointment,
            )
            .optional()
            .map_err(InfraError::from)?;

        tx.commit().map_err(InfraError::from)?;

        Ok(match (changed, row) {
            (_, None) => PaymentOutcome::NotFound,
            (0, Some(_)) => PaymentOutcome::AlreadyPaid,
            (_, Some(updated)) => PaymentOutcome::Applied(updated),
        })
    }

    #[instrument(skip(self))]
    async fn list_for_provider(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>> {
        let conn = self.manager.get()?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {APPOINTMENT_COLUMNS} FROM appointments
                 WHERE provider_id = ?1 AND date = ?2
                 ORDER BY time ASC"
            ))
            .map_err(InfraError::from)?;

        let rows = stmt
            .query_map(params![provider_id, date], row_to_appointment)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;

        Ok(rows)
    }
}

fn row_to_appointment(row: &rusqlite::Row<'_>) -> rusqlite::Result<Appointment> {
    let status: String = row.get(7)?;
    let payment_status: String = row.get(8)?;

    Ok(Appointment {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        provider_id: row.get(2)?,
        date: row.get(3)?,
        time: row.get(4)?,
        service_name: row.get(5)?,
        service_price: row.get(6)?,
        status: parse_enum(7, &status)?,
        payment_status: parse_enum(8, &payment_status)?,
        payment_method: row.get(9)?,
        notes: row.get(10)?,
        created_at: row.get(11)?,
    })
}

fn parse_enum<T: FromStr>(idx: usize, raw: &str) -> rusqlite::Result<T> {
    raw.parse::<T>()
        .map_err(|_| rusqlite::Error::InvalidColumnType(idx, raw.to_owned(), Type::Text))
}

// Only a UNIQUE failure means the slot index fired; other constraint
// failures (NOT NULL, CHECK, primary key) are genuine faults.
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

#[cfg(test)]
mod tests {
    use chairside_domain::ClinicError;
    use chrono::Utc;

    use super::*;

    fn setup() -> (Arc<DbManager>, tempfile::TempDir) {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let manager = Arc::new(DbManager::new(temp_dir.path().join("test.db"), 2).unwrap());
        manager.run_migrations().unwrap();
        (manager, temp_dir)
    }

    fn make_appointment(provider_id: Uuid, time: NaiveTime) -> Appointment {
        Appointment {
            id: Uuid::now_v7(),
            patient_id: Uuid::now_v7(),
            provider_id,
            date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            time,
            service_name: "Dental Checkup".into(),
            service_price: 500.0,
            status: AppointmentStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            payment_method: None,
            notes: None,
            created_at: Utc::now(),
        }
    }

    fn ten_am() -> NaiveTime {
        NaiveTime::from_hms_opt(10, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn insert_round_trips_all_fields() {
        let (manager, _temp) = setup();
        let repo = SqliteAppointmentRepository::new(manager);

        let appointment = make_appointment(Uuid::now_v7(), ten_am());
        assert!(matches!(repo.insert_if_free(&appointment).await.unwrap(), SlotClaim::Created));

        let found = repo.find(appointment.id).await.unwrap().unwrap();
        assert_eq!(found.patient_id, appointment.patient_id);
        assert_eq!(found.time, appointment.time);
        assert_eq!(found.status, AppointmentStatus::Pending);
        assert_eq!(found.payment_status, PaymentStatus::Unpaid);
        assert!((found.service_price - 500.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn second_claim_for_the_same_slot_conflicts() {
        let (manager, _temp) = setup();
        let repo = SqliteAppointmentRepository::new(manager);

        let provider_id = Uuid::now_v7();
        let first = make_appointment(provider_id, ten_am());
        let second = make_appointment(provider_id, ten_am());

        assert!(matches!(repo.insert_if_free(&first).await.unwrap(), SlotClaim::Created));
        assert!(matches!(repo.insert_if_free(&second).await.unwrap(), SlotClaim::Conflict));

        let times = repo.occupied_times(provider_id, first.date).await.unwrap();
        assert_eq!(times, vec![ten_am()]);
    }

    #[tokio::test]
    async fn duplicate_id_surfaces_as_a_fault_not_a_conflict() {
        let (manager, _temp) = setup();
        let repo = SqliteAppointmentRepository::new(manager);

        let appointment = make_appointment(Uuid::now_v7(), ten_am());
        repo.insert_if_free(&appointment).await.unwrap();

        // Same primary key at a free slot: the id constraint fires, not the
        // slot index, so this must not read as a booking conflict.
        let mut duplicate = appointment.clone();
        duplicate.time = NaiveTime::from_hms_opt(11, 0, 0).unwrap();
        let err = repo.insert_if_free(&duplicate).await.unwrap_err();
        assert!(matches!(err, ClinicError::Database(_)));
    }

    #[tokio::test]
    async fn cancelled_rows_leave_the_occupancy_snapshot() {
        let (manager, _temp) = setup();
        let repo = SqliteAppointmentRepository::new(manager);

        let provider_id = Uuid::now_v7();
        let appointment = make_appointment(provider_id, ten_am());
        repo.insert_if_free(&appointment).await.unwrap();

        let outcome = repo
            .transition(
                appointment.id,
                &AppointmentStatus::CANCELLABLE,
                AppointmentStatus::Cancelled,
                None,
            )
            .await
            .unwrap();
        assert!(matches!(outcome, TransitionOutcome::Applied(_)));

        assert!(repo.occupied_times(provider_id, appointment.date).await.unwrap().is_empty());

        // The freed slot accepts a fresh claim.
        let replacement = make_appointment(provider_id, ten_am());
        assert!(matches!(repo.insert_if_free(&replacement).await.unwrap(), SlotClaim::Created));
    }

    #[tokio::test]
    async fn transition_guard_refuses_and_reports_current_status() {
        let (manager, _temp) = setup();
        let repo = SqliteAppointmentRepository::new(manager);

        let appointment = make_appointment(Uuid::now_v7(), ten_am());
        repo.insert_if_free(&appointment).await.unwrap();

        let outcome = repo
            .transition(
                appointment.id,
                &[AppointmentStatus::Scheduled, AppointmentStatus::Confirmed],
                AppointmentStatus::Completed,
                Some("notes".into()),
            )
            .await
            .unwrap();
        assert!(matches!(outcome, TransitionOutcome::Refused(AppointmentStatus::Pending)));

        let unknown = repo
            .transition(
                Uuid::now_v7(),
                &[AppointmentStatus::Pending],
                AppointmentStatus::Scheduled,
                None,
            )
            .await
            .unwrap();
        assert!(matches!(unknown, TransitionOutcome::NotFound));
    }

    #[tokio::test]
    async fn payment_is_guarded_against_double_recording() {
        let (manager, _temp) = setup();
        let repo = SqliteAppointmentRepository::new(manager);

        let appointment = make_appointment(Uuid::now_v7(), ten_am());
        repo.insert_if_free(&appointment).await.unwrap();

        let outcome = repo.record_payment(appointment.id, "GCash").await.unwrap();
        let PaymentOutcome::Applied(paid) = outcome else {
            panic!("first payment should apply");
        };
        assert_eq!(paid.payment_status, PaymentStatus::Paid);
        assert_eq!(paid.payment_method.as_deref(), Some("GCash"));

        let outcome = repo.record_payment(appointment.id, "Cash").await.unwrap();
        assert!(matches!(outcome, PaymentOutcome::AlreadyPaid));
    }
}
