//! Connector / EVSE model (spec.md §3 "Connector", §4.5 C5).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    Operative,
    Inoperative,
}

/// Version-agnostic union of the OCPP 1.6 and 2.0.1 connector status
/// enumerations. The protocol adapter tables (`application::protocol::v16`,
/// `::v201`) translate to/from the wire-specific enum when building a
/// StatusNotification payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectorStatus {
    Available,
    Preparing,
    Charging,
    SuspendedEvse,
    SuspendedEv,
    Finishing,
    Reserved,
    Unavailable,
    Faulted,
    /// OCPP 2.0.1 collapses Preparing/Charging/Finishing/Suspended* into `Occupied`.
    Occupied,
}

/// One recorded status transition, oldest first — spec.md §3's
/// "status monotonicity" invariant: transitions are recorded in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEntry {
    pub status: ConnectorStatus,
    pub at: DateTime<Utc>,
}

/// A metered charging session bookkeeping record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveTransaction {
    pub transaction_id: i64,
    pub id_tag: String,
    pub started_at: DateTime<Utc>,
    pub meter_start_wh: u64,
}

#[derive(Debug, Clone)]
pub struct Connector {
    pub id: u32,
    pub availability: Availability,
    status_log: Vec<StatusEntry>,
    pub active_transaction: Option<ActiveTransaction>,
    /// Accumulated active-energy register, in Wh — monotonically increasing.
    pub energy_register_wh: u64,
}

impl Connector {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            availability: Availability::Operative,
            status_log: vec![StatusEntry {
                status: ConnectorStatus::Available,
                at: Utc::now(),
            }],
            active_transaction: None,
            energy_register_wh: 0,
        }
    }

    pub fn status(&self) -> ConnectorStatus {
        self.status_log
            .last()
            .map(|e| e.status)
            .unwrap_or(ConnectorStatus::Available)
    }

    pub fn status_log(&self) -> &[StatusEntry] {
        &self.status_log
    }

    /// Record a status transition if it differs from the current one.
    /// Returns `true` if a transition was recorded (caller should emit a
    /// StatusNotification). When `strict` is true, a transition that skips
    /// the expected intermediate state (e.g. `Available` → `Charging`
    /// without passing through `Preparing`/`Occupied`) is rejected.
    pub fn set_status(&mut self, status: ConnectorStatus, strict: bool) -> DomainResult<bool> {
        let current = self.status();
        if current == status {
            return Ok(false);
        }
        if strict && !is_allowed_transition(current, status) {
            return Err(DomainError::Other(format!(
                "illegal status transition {:?} -> {:?} under strict compliance",
                current, status
            )));
        }
        self.status_log.push(StatusEntry {
            status,
            at: Utc::now(),
        });
        Ok(true)
    }

    pub fn is_available(&self) -> bool {
        matches!(self.availability, Availability::Operative)
            && !matches!(
                self.status(),
                ConnectorStatus::Unavailable | ConnectorStatus::Faulted
            )
    }

    pub fn has_active_transaction(&self) -> bool {
        self.active_transaction.is_some()
    }

    pub fn start_transaction(
        &mut self,
        transaction_id: i64,
        id_tag: impl Into<String>,
    ) -> DomainResult<()> {
        if self.active_transaction.is_some() {
            return Err(DomainError::TransactionAlreadyActive(self.id));
        }
        self.active_transaction = Some(ActiveTransaction {
            transaction_id,
            id_tag: id_tag.into(),
            started_at: Utc::now(),
            meter_start_wh: self.energy_register_wh,
        });
        Ok(())
    }

    pub fn stop_transaction(&mut self) -> DomainResult<ActiveTransaction> {
        self.active_transaction
            .take()
            .ok_or(DomainError::NoActiveTransaction(self.id))
    }

    /// Accumulate simulated energy delivery, advancing the active-energy register.
    pub fn accumulate_energy(&mut self, delta_wh: u64) {
        self.energy_register_wh += delta_wh;
    }
}

/// Whether `to` is a legal direct successor of `from` under strict compliance.
fn is_allowed_transition(from: ConnectorStatus, to: ConnectorStatus) -> bool {
    use ConnectorStatus::*;
    match (from, to) {
        (Available, Preparing) | (Available, Occupied) => true,
        (Preparing, Charging) | (Preparing, Available) | (Preparing, Faulted) => true,
        (Charging, SuspendedEvse)
        | (Charging, SuspendedEv)
        | (Charging, Finishing)
        | (Charging, Faulted) => true,
        (SuspendedEvse, Charging) | (SuspendedEv, Charging) => true,
        (Finishing, Available) | (Finishing, Faulted) => true,
        (_, Unavailable) | (Unavailable, Available) => true,
        (_, Faulted) => true,
        (Faulted, Available) => true,
        (Occupied, Available) => true,
        _ => from == to,
    }
}

/// An EVSE owns an ordered set of connectors (spec.md §3: "A station optionally
/// exposes an EVSE layer ... when present, connectors live *inside* an EVSE").
#[derive(Debug, Clone)]
pub struct Evse {
    pub id: u32,
    pub availability: Availability,
    pub connectors: Vec<Connector>,
}

impl Evse {
    pub fn new(id: u32, connector_ids: impl IntoIterator<Item = u32>) -> Self {
        Self {
            id,
            availability: Availability::Operative,
            connectors: connector_ids.into_iter().map(Connector::new).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_uniqueness_invariant() {
        let mut c = Connector::new(1);
        c.start_transaction(1, "TAG1").unwrap();
        assert!(c.has_active_transaction());
        assert!(matches!(
            c.start_transaction(2, "TAG2"),
            Err(DomainError::TransactionAlreadyActive(1))
        ));
    }

    #[test]
    fn stop_without_start_fails() {
        let mut c = Connector::new(1);
        assert!(matches!(
            c.stop_transaction(),
            Err(DomainError::NoActiveTransaction(1))
        ));
    }

    #[test]
    fn strict_mode_rejects_illegal_skip() {
        let mut c = Connector::new(1);
        assert!(c.set_status(ConnectorStatus::Charging, true).is_err());
        assert!(c.set_status(ConnectorStatus::Charging, false).is_ok());
    }

    #[test]
    fn status_log_records_insertion_order() {
        let mut c = Connector::new(1);
        c.set_status(ConnectorStatus::Preparing, true).unwrap();
        c.set_status(ConnectorStatus::Charging, true).unwrap();
        let log = c.status_log();
        assert_eq!(log.len(), 3);
        assert_eq!(log[1].status, ConnectorStatus::Preparing);
        assert_eq!(log[2].status, ConnectorStatus::Charging);
    }
}
