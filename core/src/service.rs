//! Single-task loot service loop.
//!
//! Binds inbound game events to tracker mutations and drives the loot
//! scheduler. All commands and scheduler ticks are processed on one task,
//! which gives the concurrency contract for free: no event handler ever
//! runs concurrently with another or with a sweep, and events are handled
//! strictly in delivery order.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use autoloot_types::LootConfig;

use crate::events::{GameEvent, GameId};
use crate::scheduler::{LootScheduler, SweepTick};
use crate::tracker::{EventOutcome, LootTracker};

/// Outbound fire-and-forget pickup request. No response is awaited; the
/// remote authority may reject it silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickupRequest {
    pub drop_id: GameId,
}

/// Commands accepted by the service loop.
#[derive(Debug)]
pub enum ServiceCommand {
    Event(GameEvent),
    UpdateConfig(LootConfig),
    SetTemplate(String),
    /// Manual single-item pickup attempt, outside the timer sweep.
    TryLoot(GameId),
    Status(oneshot::Sender<ServiceStatus>),
    Shutdown,
}

/// Snapshot of service state for the command surface.
#[derive(Debug, Clone)]
pub struct ServiceStatus {
    pub overworld: bool,
    pub instance: bool,
    pub active_template: String,
    pub templates: Vec<String>,
    pub tracked_drops: usize,
    pub zone: Option<i32>,
    pub mounted: bool,
    pub dead: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Service Handle
// ─────────────────────────────────────────────────────────────────────────────

/// Handle to communicate with the running loot service.
#[derive(Clone)]
pub struct ServiceHandle {
    cmd_tx: mpsc::Sender<ServiceCommand>,
}

impl ServiceHandle {
    /// Forward a decoded game event to the service.
    pub async fn send_event(&self, event: GameEvent) -> Result<(), String> {
        self.send(ServiceCommand::Event(event)).await
    }

    /// Push a fresh config snapshot (e.g. after a file reload).
    pub async fn update_config(&self, config: LootConfig) -> Result<(), String> {
        self.send(ServiceCommand::UpdateConfig(config)).await
    }

    /// Switch the active template. The caller validates the name against
    /// its config before calling; unknown names are logged and ignored.
    pub async fn set_template(&self, name: String) -> Result<(), String> {
        self.send(ServiceCommand::SetTemplate(name)).await
    }

    /// Attempt a direct single-item pickup.
    pub async fn try_loot(&self, drop_id: GameId) -> Result<(), String> {
        self.send(ServiceCommand::TryLoot(drop_id)).await
    }

    /// Query current state.
    pub async fn status(&self) -> Result<ServiceStatus, String> {
        let (tx, rx) = oneshot::channel();
        self.send(ServiceCommand::Status(tx)).await?;
        rx.await.map_err(|e| e.to_string())
    }

    /// Stop the service loop and cancel any pending timer.
    pub async fn shutdown(&self) -> Result<(), String> {
        self.send(ServiceCommand::Shutdown).await
    }

    async fn send(&self, cmd: ServiceCommand) -> Result<(), String> {
        self.cmd_tx.send(cmd).await.map_err(|e| e.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Service Loop
// ─────────────────────────────────────────────────────────────────────────────

pub struct LootService {
    tracker: LootTracker,
    scheduler: LootScheduler,
    cmd_rx: mpsc::Receiver<ServiceCommand>,
    tick_rx: mpsc::Receiver<SweepTick>,
    request_tx: mpsc::Sender<PickupRequest>,
}

impl LootService {
    /// Spawn the service on its own task and return a handle to it.
    pub fn spawn(
        config: Option<LootConfig>,
        request_tx: mpsc::Sender<PickupRequest>,
    ) -> (ServiceHandle, JoinHandle<()>) {
        let (cmd_tx, cmd_rx) = mpsc::channel(256);
        let (tick_tx, tick_rx) = mpsc::channel(8);

        let service = Self {
            tracker: LootTracker::new(config),
            scheduler: LootScheduler::new(tick_tx),
            cmd_rx,
            tick_rx,
            request_tx,
        };
        let task = tokio::spawn(service.run());
        (ServiceHandle { cmd_tx }, task)
    }

    async fn run(mut self) {
        tracing::info!("loot service started");
        loop {
            tokio::select! {
                cmd = self.cmd_rx.recv() => match cmd {
                    Some(cmd) => {
                        if self.handle_command(cmd).await {
                            break;
                        }
                    }
                    // All handles dropped; nothing can reach us anymore.
                    None => break,
                },
                Some(SweepTick) = self.tick_rx.recv() => self.handle_tick().await,
            }
        }
        self.scheduler.disarm();
        tracing::info!("loot service stopped");
    }

    /// Returns true when the loop should stop.
    async fn handle_command(&mut self, cmd: ServiceCommand) -> bool {
        match cmd {
            ServiceCommand::Event(event) => {
                if self.tracker.handle_event(&event) == EventOutcome::DropAdmitted {
                    self.scheduler.arm(self.tracker.loot_interval());
                }
            }
            ServiceCommand::UpdateConfig(config) => {
                self.tracker.update_config(config);
            }
            ServiceCommand::SetTemplate(name) => {
                if !self.tracker.set_active_template(&name) {
                    tracing::warn!(template = %name, "ignoring unknown template");
                }
            }
            ServiceCommand::TryLoot(drop_id) => {
                let eligible = self
                    .tracker
                    .find_drop(drop_id)
                    .is_some_and(|drop| self.tracker.try_loot(drop));
                if eligible {
                    self.emit_request(drop_id).await;
                }
            }
            ServiceCommand::Status(reply) => {
                let _ = reply.send(self.status());
            }
            ServiceCommand::Shutdown => return true,
        }
        false
    }

    /// Timer fire: sweep the tracked drops and either re-arm or go idle.
    async fn handle_tick(&mut self) {
        // The fired timer is no longer armed.
        self.scheduler.disarm();

        let outcome = self.tracker.sweep();
        for drop_id in &outcome.requests {
            self.emit_request(*drop_id).await;
        }
        if outcome.rearm {
            self.scheduler.arm(self.tracker.loot_interval());
        }
    }

    async fn emit_request(&self, drop_id: GameId) {
        tracing::debug!(%drop_id, "requesting pickup");
        let _ = self.request_tx.send(PickupRequest { drop_id }).await;
    }

    fn status(&self) -> ServiceStatus {
        let config = self.tracker.config();
        ServiceStatus {
            overworld: config.map(|c| c.enabled.overworld).unwrap_or(false),
            instance: config.map(|c| c.enabled.instance).unwrap_or(false),
            active_template: config.map(|c| c.template.clone()).unwrap_or_default(),
            templates: config.map(|c| c.template_names()).unwrap_or_default(),
            tracked_drops: self.tracker.drops().len(),
            zone: self.tracker.zone(),
            mounted: self.tracker.is_mounted(),
            dead: self.tracker.is_dead(),
        }
    }
}
