use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::debug;

use crate::action::HackAction;
use crate::dice::DiceSource;
use crate::error::DriverError;
use crate::projection::HackSnapshot;
use crate::session::HackSession;

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);
const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug)]
pub enum SessionCmd {
    GetState {
        respond: oneshot::Sender<HackSnapshot>,
    },
    Apply {
        action: HackAction,
        respond: oneshot::Sender<ActionReport>,
    },
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionReport {
    pub applied: bool,
    pub snapshot: HackSnapshot,
}

/// Cheap, cloneable access to a session owned by a [`SessionDriver`] task.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<SessionCmd>,
    updates: watch::Receiver<HackSnapshot>,
}

impl SessionHandle {
    pub async fn state(&self) -> Result<HackSnapshot, DriverError> {
        let (tx, rx) = oneshot::channel();
        self.request(SessionCmd::GetState { respond: tx }, rx).await
    }

    pub async fn apply(&self, action: HackAction) -> Result<ActionReport, DriverError> {
        let (tx, rx) = oneshot::channel();
        self.request(
            SessionCmd::Apply {
                action,
                respond: tx,
            },
            rx,
        )
        .await
    }

    /// Receives a new snapshot after every applied action and every countdown tick.
    pub fn subscribe(&self) -> watch::Receiver<HackSnapshot> {
        self.updates.clone()
    }

    pub fn latest(&self) -> HackSnapshot {
        self.updates.borrow().clone()
    }

    /// Stops the driver. Safe to call more than once.
    pub fn shutdown(&self) {
        let _ = self.tx.send(SessionCmd::Shutdown);
    }

    async fn request<T>(
        &self,
        cmd: SessionCmd,
        rx: oneshot::Receiver<T>,
    ) -> Result<T, DriverError> {
        self.tx.send(cmd).map_err(|_| DriverError::Closed)?;
        rx.await.map_err(|_| DriverError::NoResponse)
    }
}

struct Ticker {
    generation: u64,
    interval: Interval,
}

enum Event {
    Command(Option<SessionCmd>),
    Tick,
}

/// Owns a [`HackSession`] on a tokio task. Commands are applied one at a time, and the
/// countdown ticker only exists while the session says its countdown is running.
pub struct SessionDriver<D> {
    session: HackSession<D>,
    rx: mpsc::UnboundedReceiver<SessionCmd>,
    updates: watch::Sender<HackSnapshot>,
    tick_interval: Duration,
    ticker: Option<Ticker>,
}

impl<D: DiceSource + Send + 'static> SessionDriver<D> {
    /// Spawns the driver. The join handle yields the session back once every handle is
    /// dropped or [`SessionHandle::shutdown`] is called.
    pub fn spawn(
        session: HackSession<D>,
        tick_interval: Duration,
    ) -> (SessionHandle, JoinHandle<HackSession<D>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (updates, updates_rx) = watch::channel(session.snapshot());
        let driver = Self {
            session,
            rx,
            updates,
            tick_interval: tick_interval.max(MIN_TICK_INTERVAL),
            ticker: None,
        };
        let task = tokio::spawn(driver.run());
        (
            SessionHandle {
                tx,
                updates: updates_rx,
            },
            task,
        )
    }

    async fn run(mut self) -> HackSession<D> {
        loop {
            self.sync_ticker();
            let event = tokio::select! {
                biased;
                cmd = self.rx.recv() => Event::Command(cmd),
                () = next_tick(&mut self.ticker) => Event::Tick,
            };
            match event {
                Event::Command(None) | Event::Command(Some(SessionCmd::Shutdown)) => break,
                Event::Command(Some(cmd)) => self.handle(cmd),
                Event::Tick => {
                    if self.session.tick() {
                        self.publish();
                    }
                }
            }
        }
        self.ticker = None;
        debug!(generation = self.session.generation(), "hack session driver stopped");
        self.session
    }

    fn handle(&mut self, cmd: SessionCmd) {
        match cmd {
            SessionCmd::GetState { respond } => {
                let _ = respond.send(self.session.snapshot());
            }
            SessionCmd::Apply { action, respond } => {
                let applied = action.apply(&mut self.session);
                let snapshot = self.publish();
                let _ = respond.send(ActionReport { applied, snapshot });
            }
            SessionCmd::Shutdown => {}
        }
    }

    fn publish(&self) -> HackSnapshot {
        let snapshot = self.session.snapshot();
        self.updates.send_replace(snapshot.clone());
        snapshot
    }

    /// Arms a fresh ticker for the current run or drops a stale one.
    fn sync_ticker(&mut self) {
        if !self.session.countdown_running() {
            if self.ticker.take().is_some() {
                debug!(generation = self.session.generation(), "countdown ticker stopped");
            }
            return;
        }

        let generation = self.session.generation();
        if self
            .ticker
            .as_ref()
            .is_some_and(|ticker| ticker.generation == generation)
        {
            return;
        }

        let mut interval =
            tokio::time::interval_at(Instant::now() + self.tick_interval, self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.ticker = Some(Ticker {
            generation,
            interval,
        });
        debug!(generation, "countdown ticker armed");
    }
}

async fn next_tick(ticker: &mut Option<Ticker>) {
    match ticker {
        Some(ticker) => {
            ticker.interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
