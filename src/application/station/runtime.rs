//! Station Runtime (C7, spec.md §4.7).
//!
//! Owns exactly one WebSocket, one outbound writer, one inbound reader, one
//! heartbeat timer, one ATG (with N connector loops), and one configuration
//! snapshot. The WebSocket handling splits sink/stream, feeds a dedicated
//! writer task through a channel, and integrates shutdown via
//! `tokio::select!` on the client side (`connect_async` instead of
//! accepting a connection).

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::protocol::Message;
use tracing::{error, info, warn};

use crate::application::atg::{run_connector_loop, AtgHost, IdTagPicker, StartTransactionStatus as AtgStartStatus};
use crate::application::events::EventBus;
use crate::application::protocol::outbound::{build_call, requires_retry, should_buffer};
use crate::application::station::meter;
use crate::application::protocol::pending::PendingRequests;
use crate::application::protocol::state_machine::{BootOutcome, BootStatus, HeartbeatScheduler, RegistrationStateMachine};
use crate::application::protocol::v201;
use crate::application::protocol::ProtocolError;
use crate::application::variable_registry::{VariableOverlay, VariableRegistry};
use crate::domain::atg::{AtgConfig, AtgStatus};
use crate::domain::configuration_key::ConfigurationStore;
use crate::domain::connector::{Connector, ConnectorStatus};
use crate::domain::error::DomainResult;
use crate::domain::events::{Event, StationLifecycleEvent};
use crate::domain::ports::{PerformanceRecorder, StationPersistence};
use crate::domain::station::{RegistrationState, Station, StationSnapshot};
use crate::support::ocpp_frame::OcppFrame;
use crate::support::shutdown::{wait_with_deadline, ShutdownSignal};

use super::incoming::{dispatch_incoming_call, FollowUp, IncomingContext};

#[derive(Clone)]
pub struct RuntimeConfig {
    pub message_timeout: Duration,
    pub message_attempts: u32,
    pub message_attempt_interval: Duration,
    pub strict_compliance: bool,
    pub stop_transactions_on_stopped: bool,
    pub shutdown_deadline_secs: u64,
    pub reporting_value_size_limit: usize,
    pub meter_interval_secs: u64,
    pub meter_energy_delta_wh: u64,
    pub sampled_measurands: Vec<String>,
}

/// One simulated station's full runtime state.
pub struct StationRuntime {
    station: Station,
    connectors: Mutex<HashMap<u32, Connector>>,
    has_evses: bool,
    configuration: Mutex<ConfigurationStore>,
    overlay: Mutex<VariableOverlay>,
    registry: Arc<VariableRegistry>,
    registration: Mutex<RegistrationStateMachine>,
    pending: PendingRequests,
    shutdown: ShutdownSignal,
    atg_handles: Mutex<Vec<JoinHandle<()>>>,
    heartbeat_handle: Mutex<Option<JoinHandle<()>>>,
    reader_handle: Mutex<Option<JoinHandle<()>>>,
    events: Arc<EventBus>,
    persistence: Arc<dyn StationPersistence>,
    performance: Arc<dyn PerformanceRecorder>,
    atg_config: AtgConfig,
    id_tag: Arc<IdTagPicker>,
    config: RuntimeConfig,
    writer_tx: Mutex<Option<mpsc::UnboundedSender<Message>>>,
    next_transaction_id: AtomicI64,
}

impl StationRuntime {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        station: Station,
        connector_ids: Vec<u32>,
        has_evses: bool,
        configuration: ConfigurationStore,
        registry: Arc<VariableRegistry>,
        atg_config: AtgConfig,
        id_tags: Vec<String>,
        events: Arc<EventBus>,
        persistence: Arc<dyn StationPersistence>,
        performance: Arc<dyn PerformanceRecorder>,
        config: RuntimeConfig,
    ) -> Arc<Self> {
        let connectors = connector_ids.into_iter().map(|id| (id, Connector::new(id))).collect();
        let distribution = atg_config.id_tag_distribution;
        Arc::new(Self {
            station,
            connectors: Mutex::new(connectors),
            has_evses,
            configuration: Mutex::new(configuration),
            overlay: Mutex::new(VariableOverlay::new()),
            registry,
            registration: Mutex::new(RegistrationStateMachine::new(None)),
            pending: PendingRequests::new(),
            shutdown: ShutdownSignal::new(),
            atg_handles: Mutex::new(Vec::new()),
            heartbeat_handle: Mutex::new(None),
            reader_handle: Mutex::new(None),
            events,
            persistence,
            performance,
            atg_config,
            id_tag: Arc::new(IdTagPicker::new(id_tags, distribution)),
            config,
            writer_tx: Mutex::new(None),
            next_transaction_id: AtomicI64::new(1),
        })
    }

    pub fn station_id(&self) -> &str {
        &self.station.station_id
    }

    pub async fn registration_state(&self) -> RegistrationState {
        self.registration.lock().await.state()
    }

    /// Opens the WebSocket, performs the Boot→Accepted handshake, and spawns
    /// the reader, heartbeat, and ATG tasks (spec.md §4.7).
    pub async fn start(self: &Arc<Self>) -> DomainResult<()> {
        let mut request = self
            .station
            .connection_url()
            .into_client_request()
            .map_err(|e| crate::domain::error::DomainError::Other(e.to_string()))?;
        request.headers_mut().insert(
            "Sec-WebSocket-Protocol",
            self.station.ocpp_version.subprotocol().parse().expect("static header value"),
        );

        self.registration.lock().await.on_connecting();
        let (ws_stream, _response) = tokio_tungstenite::connect_async(request)
            .await
            .map_err(|e| crate::domain::error::DomainError::Other(format!("websocket connect failed: {e}")))?;
        self.registration.lock().await.on_socket_open();

        let (mut write, mut read) = ws_stream.split();
        let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
        *self.writer_tx.lock().await = Some(tx.clone());

        tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                if write.send(message).await.is_err() {
                    break;
                }
            }
        });

        self.perform_boot_sequence().await?;

        let this = Arc::clone(self);
        let reader_handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = this.shutdown.notified().wait() => break,
                    frame = read.next() => {
                        match frame {
                            Some(Ok(Message::Text(text))) => this.handle_inbound_text(&text).await,
                            Some(Ok(Message::Close(_))) | None => {
                                info!(station_id = %this.station.station_id, "socket closed");
                                break;
                            }
                            Some(Ok(_)) => {}
                            Some(Err(err)) => {
                                warn!(station_id = %this.station.station_id, %err, "websocket read error");
                                break;
                            }
                        }
                    }
                }
            }
            this.pending.fail_all_disconnected();
            this.registration.lock().await.on_socket_closed();
        });
        *self.reader_handle.lock().await = Some(reader_handle);

        self.spawn_atg_tasks();
        self.spawn_meter_tasks();
        Ok(())
    }

    async fn perform_boot_sequence(self: &Arc<Self>) -> DomainResult<()> {
        loop {
            let payload = json!({
                "chargePointVendor": self.station.info.charge_point_vendor,
                "chargePointModel": self.station.info.charge_point_model,
                "firmwareVersion": self.station.info.firmware_version,
            });
            let response = self.send_call("BootNotification", &payload).await;
            let response = match response {
                Ok(value) => value,
                Err(err) => {
                    warn!(station_id = %self.station.station_id, %err, "BootNotification failed, will retry");
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    continue;
                }
            };

            let status = match response["status"].as_str() {
                Some("Accepted") => BootStatus::Accepted,
                Some("Pending") => BootStatus::Pending,
                _ => BootStatus::Rejected,
            };
            let interval = response["interval"].as_u64().unwrap_or(60) as u32;

            let outcome = self.registration.lock().await.on_boot_response(status, interval);
            match outcome {
                Some(BootOutcome::Accepted { heartbeat_interval_secs }) => {
                    self.on_accepted(heartbeat_interval_secs).await;
                    return Ok(());
                }
                Some(BootOutcome::RetryAfter { retry_delay_secs }) | Some(BootOutcome::Rejected { retry_delay_secs }) => {
                    tokio::time::sleep(Duration::from_secs(retry_delay_secs as u64)).await;
                }
                None => {
                    return Err(crate::domain::error::DomainError::Other(
                        "boot retry budget exhausted".to_string(),
                    ));
                }
            }
        }
    }

    async fn on_accepted(self: &Arc<Self>, heartbeat_interval_secs: u32) {
        self.events.publish(Event::Accepted(crate::domain::events::RegistrationEvent {
            station_id: self.station.station_id.clone(),
            interval: heartbeat_interval_secs as i32,
            timestamp: Utc::now(),
        }));

        let connector_ids: Vec<u32> = self.connectors.lock().await.keys().copied().collect();
        for connector_id in connector_ids {
            let status = self.connectors.lock().await.get(&connector_id).map(|c| c.status());
            if let Some(status) = status {
                let _ = self.send_call(
                    "StatusNotification",
                    &json!({ "connectorId": connector_id, "status": status_name(status) }),
                ).await;
            }
        }

        let this = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let scheduler = HeartbeatScheduler::new(heartbeat_interval_secs);
            loop {
                tokio::select! {
                    _ = this.shutdown.notified().wait() => break,
                    _ = tokio::time::sleep(scheduler.interval()) => {
                        if this.registration_state().await != RegistrationState::Accepted {
                            break;
                        }
                        let _ = this.send_call("Heartbeat", &json!({})).await;
                    }
                }
            }
        });
        *self.heartbeat_handle.lock().await = Some(handle);
    }

    async fn handle_inbound_text(self: &Arc<Self>, text: &str) {
        let frame = match OcppFrame::parse(text) {
            Ok(frame) => frame,
            Err(err) => {
                warn!(station_id = %self.station.station_id, %err, "malformed inbound frame");
                return;
            }
        };

        match frame {
            OcppFrame::Call { message_id, action, payload } => {
                let ctx = IncomingContext {
                    version: self.station.ocpp_version,
                    strict: self.config.strict_compliance,
                    registration: &self.registration,
                    connectors: &self.connectors,
                    configuration: &self.configuration,
                    overlay: &self.overlay,
                    registry: &self.registry,
                    station_id: &self.station.station_id,
                    has_evses: self.has_evses,
                };
                let response = dispatch_incoming_call(&action, payload, &ctx).await;
                let (reply, follow_up) = match response {
                    Ok((payload, follow_up)) => (OcppFrame::CallResult { message_id, payload }, follow_up),
                    Err((code, description)) => (OcppFrame::error_response(message_id, code, description), None),
                };
                self.write_frame(reply).await;
                if let Some(follow_up) = follow_up {
                    self.act_on_follow_up(follow_up);
                }
            }
            OcppFrame::CallResult { message_id, payload } => {
                self.pending.resolve(&message_id, payload);
            }
            OcppFrame::CallError {
                message_id,
                error_code,
                error_description,
                ..
            } => {
                self.pending.reject(&message_id, error_code, error_description);
            }
        }
    }

    async fn write_frame(&self, frame: OcppFrame) {
        let text = frame.serialize();
        if let Some(tx) = self.writer_tx.lock().await.as_ref() {
            let _ = tx.send(Message::Text(text.into()));
        }
    }

    /// Carries out the asynchronous work an incoming-Call handler deferred
    /// until after its CallResult went out (spec.md §4.4).
    fn act_on_follow_up(self: &Arc<Self>, follow_up: FollowUp) {
        match follow_up {
            FollowUp::NotifyReport { request_id, items } => {
                let this = Arc::clone(self);
                tokio::spawn(async move { this.send_notify_report_chunks(request_id, items).await });
            }
            FollowUp::Reset(decision) => self.act_on_reset_decision(decision),
        }
    }

    async fn send_notify_report_chunks(&self, request_id: Value, items: Vec<v201::ReportDatum>) {
        for chunk in v201::build_notify_report_chunks(items) {
            let payload = json!({
                "requestId": request_id,
                "generatedAt": Utc::now(),
                "seqNo": chunk.seq_no,
                "tbc": chunk.tbc,
                "reportData": chunk.report_data,
            });
            if let Err(err) = self.send_call("NotifyReport", &payload).await {
                warn!(station_id = %self.station.station_id, seq_no = chunk.seq_no, %err, "NotifyReport failed");
            }
        }
    }

    /// Performs or schedules the reset an accepted/scheduled Reset decided on
    /// (spec.md §4.4 "Reset (2.0)" decision table).
    fn act_on_reset_decision(self: &Arc<Self>, decision: v201::ResetDecision) {
        match decision {
            v201::ResetDecision::AcceptedNow | v201::ResetDecision::AcceptedIdleNow => {
                let this = Arc::clone(self);
                tokio::spawn(async move {
                    if let Err(err) = this.reset("Remote").await {
                        error!(station_id = %this.station.station_id, %err, "reset failed");
                    }
                });
            }
            v201::ResetDecision::Scheduled => {
                let this = Arc::clone(self);
                tokio::spawn(async move { this.poll_until_idle_then_reset().await });
            }
            v201::ResetDecision::UnsupportedRequest | v201::ResetDecision::UnknownEvse => {}
        }
    }

    /// Polls every `ONIDLE_POLL_INTERVAL_SECS` until no connector has an
    /// active transaction, then resets (spec.md §4.4: OnIdle with a running
    /// transaction answers `Scheduled` and resets once the station goes idle).
    async fn poll_until_idle_then_reset(self: Arc<Self>) {
        loop {
            tokio::select! {
                _ = self.shutdown.notified().wait() => return,
                _ = tokio::time::sleep(Duration::from_secs(v201::reset::ONIDLE_POLL_INTERVAL_SECS)) => {
                    let idle = {
                        let connectors = self.connectors.lock().await;
                        !connectors.values().any(|c| c.has_active_transaction())
                    };
                    if idle {
                        if let Err(err) = self.reset("Remote").await {
                            error!(station_id = %self.station.station_id, %err, "scheduled reset failed");
                        }
                        return;
                    }
                }
            }
        }
    }

    /// `requestHandler(command, payload, opts)` (spec.md §4.3).
    pub async fn send_call(&self, action: &str, payload: &Value) -> Result<Value, ProtocolError> {
        let state = self.registration.lock().await.state();
        let (frame, awaiting) = build_call(&self.pending, action, payload, self.config.message_timeout);
        if should_buffer(state, action) {
            // Buffering without an active writer just means retry at the
            // caller's discretion; the simulator doesn't persist across a
            // socket that was never opened.
            warn!(action, "deferring Call: station not yet Accepted");
        }
        self.write_frame(frame).await;

        let mut attempts = 1;
        let mut result = awaiting.wait().await;
        while result.is_err() && requires_retry(action) && attempts < self.config.message_attempts {
            attempts += 1;
            tokio::time::sleep(self.config.message_attempt_interval).await;
            let (frame, awaiting) = build_call(&self.pending, action, payload, self.config.message_timeout);
            self.write_frame(frame).await;
            result = awaiting.wait().await;
        }
        result
    }

    fn spawn_atg_tasks(self: &Arc<Self>) {
        let host: Arc<dyn AtgHost> = Arc::new(RuntimeAtgHost {
            runtime: Arc::downgrade(self),
        });
        let connector_ids: Vec<u32> = {
            let connectors = self.connectors.try_lock().expect("no contention during startup");
            connectors.keys().copied().collect()
        };
        for connector_id in connector_ids {
            if connector_id == 0 {
                continue;
            }
            let status = Arc::new(Mutex::new(AtgStatus::new(connector_id)));
            let handle = tokio::spawn(run_connector_loop(
                connector_id,
                self.atg_config.clone(),
                status,
                host.clone(),
                self.id_tag.clone(),
                self.shutdown.clone(),
            ));
            if let Ok(mut handles) = self.atg_handles.try_lock() {
                handles.push(handle);
            }
        }
    }

    /// Per-connector meter-value sampling timer (spec.md §4.5): while a
    /// transaction is active, ticks every `meter_interval_secs` and sends a
    /// MeterValues Call carrying the configured measurands.
    fn spawn_meter_tasks(self: &Arc<Self>) {
        let connector_ids: Vec<u32> = {
            let connectors = self.connectors.try_lock().expect("no contention during startup");
            connectors.keys().copied().collect()
        };
        for connector_id in connector_ids {
            if connector_id == 0 {
                continue;
            }
            let this = Arc::clone(self);
            let handle = tokio::spawn(async move {
                loop {
                    tokio::select! {
                        _ = this.shutdown.notified().wait() => break,
                        _ = tokio::time::sleep(Duration::from_secs(this.config.meter_interval_secs)) => {
                            this.sample_connector_meter(connector_id).await;
                        }
                    }
                }
            });
            if let Ok(mut handles) = self.atg_handles.try_lock() {
                handles.push(handle);
            }
        }
    }

    async fn sample_connector_meter(&self, connector_id: u32) {
        let sample = {
            let mut connectors = self.connectors.lock().await;
            let Some(connector) = connectors.get_mut(&connector_id) else {
                return;
            };
            if !connector.has_active_transaction() {
                return;
            }
            connector.accumulate_energy(self.config.meter_energy_delta_wh);
            meter::sample(connector_id, connector.energy_register_wh, &self.config.sampled_measurands)
        };

        let sampled_value: Vec<Value> = sample
            .measurands
            .iter()
            .map(|(measurand, value)| json!({ "value": value, "measurand": measurand }))
            .collect();
        let _ = self
            .send_call(
                "MeterValues",
                &json!({
                    "connectorId": connector_id,
                    "meterValue": [{ "timestamp": sample.timestamp, "sampledValue": sampled_value }],
                }),
            )
            .await;
    }

    /// `stop()` (spec.md §4.7): stop ATG, stop heartbeat, optionally close
    /// out running transactions, close the socket, persist state.
    pub async fn stop(self: &Arc<Self>) {
        self.shutdown.trigger();

        let atg_handles: Vec<JoinHandle<()>> = std::mem::take(&mut *self.atg_handles.lock().await);
        wait_with_deadline("atg", self.config.shutdown_deadline_secs, async {
            for handle in atg_handles {
                let _ = handle.await;
            }
        })
        .await;

        if let Some(handle) = self.heartbeat_handle.lock().await.take() {
            wait_with_deadline("heartbeat", self.config.shutdown_deadline_secs, async {
                let _ = handle.await;
            })
            .await;
        }

        if self.config.stop_transactions_on_stopped {
            let connector_ids: Vec<u32> = self.connectors.lock().await.keys().copied().collect();
            for connector_id in connector_ids {
                let has_tx = self.connectors.lock().await.get(&connector_id).is_some_and(|c| c.has_active_transaction());
                if has_tx {
                    self.stop_connector_transaction(connector_id, "Local").await;
                }
            }
        }

        if let Some(tx) = self.writer_tx.lock().await.take() {
            let _ = tx.send(Message::Close(None));
        }

        if let Some(handle) = self.reader_handle.lock().await.take() {
            wait_with_deadline("reader", self.config.shutdown_deadline_secs, async {
                let _ = handle.await;
            })
            .await;
        }

        self.persist().await;

        self.events.publish(Event::Stopped(StationLifecycleEvent {
            station_id: self.station.station_id.clone(),
            timestamp: Utc::now(),
            reason: None,
        }));
    }

    async fn persist(&self) {
        let snapshot = StationSnapshot {
            station_id: self.station.station_id.clone(),
            info: self.station.info.clone(),
            configuration: {
                let store = self.configuration.lock().await;
                store.all().map(|entry| (entry.key.clone(), entry.clone())).collect()
            },
            atg_statuses: HashMap::new(),
            saved_at: Utc::now(),
        };
        if let Err(err) = self.persistence.persist_station(&self.station.station_id, &snapshot).await {
            error!(station_id = %self.station.station_id, %err, "failed to persist station snapshot");
        }
    }

    /// `reset(reason)` (spec.md §4.7) — tears the runtime down and restarts
    /// the boot sequence in place.
    pub async fn reset(self: &Arc<Self>, _reason: &str) -> DomainResult<()> {
        self.stop().await;
        self.start().await
    }

    async fn start_connector_transaction(&self, connector_id: u32, id_tag: &str) -> AtgStartStatus {
        let transaction_id = self.next_transaction_id.fetch_add(1, Ordering::SeqCst);
        let mut connectors = self.connectors.lock().await;
        let Some(connector) = connectors.get_mut(&connector_id) else {
            return AtgStartStatus::Rejected;
        };
        match connector.start_transaction(transaction_id, id_tag) {
            Ok(()) => {
                let _ = connector.set_status(ConnectorStatus::Charging, false);
                AtgStartStatus::Accepted
            }
            Err(_) => AtgStartStatus::Rejected,
        }
    }

    async fn stop_connector_transaction(&self, connector_id: u32, _reason: &str) {
        let mut connectors = self.connectors.lock().await;
        if let Some(connector) = connectors.get_mut(&connector_id) {
            if connector.stop_transaction().is_ok() {
                let _ = connector.set_status(ConnectorStatus::Available, false);
            }
        }
    }
}

fn status_name(status: ConnectorStatus) -> &'static str {
    match status {
        ConnectorStatus::Available => "Available",
        ConnectorStatus::Preparing => "Preparing",
        ConnectorStatus::Charging => "Charging",
        ConnectorStatus::SuspendedEvse => "SuspendedEVSE",
        ConnectorStatus::SuspendedEv => "SuspendedEV",
        ConnectorStatus::Finishing => "Finishing",
        ConnectorStatus::Reserved => "Reserved",
        ConnectorStatus::Unavailable => "Unavailable",
        ConnectorStatus::Faulted => "Faulted",
        ConnectorStatus::Occupied => "Occupied",
    }
}

/// Adapts [`StationRuntime`] to the [`AtgHost`] trait the ATG loop expects,
/// via a weak reference so the runtime → task → host chain doesn't form an
/// `Arc` cycle.
struct RuntimeAtgHost {
    runtime: Weak<StationRuntime>,
}

#[async_trait]
impl AtgHost for RuntimeAtgHost {
    fn is_station_accepted(&self) -> bool {
        let Some(runtime) = self.runtime.upgrade() else {
            return false;
        };
        runtime.registration.try_lock().map(|r| r.state() == RegistrationState::Accepted).unwrap_or(false)
    }

    fn connector_available(&self, connector_id: u32) -> bool {
        let Some(runtime) = self.runtime.upgrade() else {
            return false;
        };
        runtime
            .connectors
            .try_lock()
            .ok()
            .and_then(|c| c.get(&connector_id).map(|c| c.is_available()))
            .unwrap_or(false)
    }

    fn has_active_transaction(&self, connector_id: u32) -> bool {
        let Some(runtime) = self.runtime.upgrade() else {
            return false;
        };
        runtime
            .connectors
            .try_lock()
            .ok()
            .and_then(|c| c.get(&connector_id).map(|c| c.has_active_transaction()))
            .unwrap_or(false)
    }

    async fn authorize(&self, id_tag: &str) -> bool {
        let Some(runtime) = self.runtime.upgrade() else {
            return false;
        };
        let response = runtime.send_call("Authorize", &json!({ "idTag": id_tag })).await;
        matches!(response, Ok(value) if value["idTagInfo"]["status"] == "Accepted")
    }

    async fn start_transaction(&self, connector_id: u32, id_tag: &str) -> AtgStartStatus {
        let Some(runtime) = self.runtime.upgrade() else {
            return AtgStartStatus::Rejected;
        };
        let local = runtime.start_connector_transaction(connector_id, id_tag).await;
        if local != AtgStartStatus::Accepted {
            return local;
        }
        let response = runtime
            .send_call(
                "StartTransaction",
                &json!({ "connectorId": connector_id, "idTag": id_tag, "meterStart": 0, "timestamp": Utc::now() }),
            )
            .await;
        match response {
            Ok(value) if value["idTagInfo"]["status"] == "Accepted" => AtgStartStatus::Accepted,
            _ => AtgStartStatus::Rejected,
        }
    }

    async fn stop_transaction(&self, connector_id: u32) {
        let Some(runtime) = self.runtime.upgrade() else {
            return;
        };
        runtime.stop_connector_transaction(connector_id, "Local").await;
        let _ = runtime
            .send_call("StopTransaction", &json!({ "connectorId": connector_id, "timestamp": Utc::now() }))
            .await;
    }
}
