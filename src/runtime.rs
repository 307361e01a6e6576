//! # Runtime
//!
//! Drives a [`Board`] in real time on a tokio runtime. The board ticks on a
//! fixed interval; pulse generators and external sensor feeds run as their
//! own tasks and only write raw node state between ticks.
//!
//! The board sits behind an `Arc<Mutex<_>>` shared by all tasks. The lock is
//! never held across an `.await`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::board::Board;
use crate::component::{Element, ElementId};
use crate::config::SimConfig;
use crate::error::CircuitError;
use crate::source::SensorFeed;

/// Locks the board, recovering it if a task panicked while holding it.
pub fn lock(board: &Mutex<Board>) -> MutexGuard<'_, Board> {
    board.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Shared run/pause switches, cheap to clone into other threads.
///
/// A control starts out running; once stopped it stays stopped.
#[derive(Debug, Clone)]
pub struct SimControl {
    running: Arc<AtomicBool>,
    paused: Arc<AtomicBool>,
}

impl Default for SimControl {
    fn default() -> Self {
        SimControl {
            running: Arc::new(AtomicBool::new(true)),
            paused: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl SimControl {
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::SeqCst);
    }

    pub fn toggle_pause(&self) -> bool {
        !self.paused.fetch_xor(true, Ordering::SeqCst)
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }
}

struct PendingFeed {
    element: ElementId,
    feed: Box<dyn SensorFeed>,
    interval: Duration,
}

pub struct Simulator {
    board: Arc<Mutex<Board>>,
    tick_period: Duration,
    control: SimControl,
    tasks: HashMap<ElementId, Vec<JoinHandle<()>>>,
    pending_feeds: Vec<PendingFeed>,
}

impl Simulator {
    pub fn new(board: Board, config: &SimConfig) -> Self {
        Simulator {
            board: Arc::new(Mutex::new(board)),
            tick_period: config.tick_period(),
            control: SimControl::default(),
            tasks: HashMap::new(),
            pending_feeds: Vec::new(),
        }
    }

    pub fn board(&self) -> Arc<Mutex<Board>> {
        Arc::clone(&self.board)
    }

    pub fn control(&self) -> SimControl {
        self.control.clone()
    }

    pub fn stop(&self) {
        self.control.stop();
    }

    pub fn is_running(&self) -> bool {
        self.control.is_running()
    }

    /// Connects an external feed to a sound or webcam sensor. The feed is
    /// polled every `interval` once the simulator runs.
    pub fn attach_feed(
        &mut self,
        element: ElementId,
        feed: Box<dyn SensorFeed>,
        interval: Duration,
    ) -> Result<(), CircuitError> {
        {
            let board = lock(&self.board);
            let target = board
                .element(element)
                .ok_or(CircuitError::NoSuchElement(element))?;
            if board.source_node(element).is_none() {
                return Err(CircuitError::NotInteractive(target.name().to_string()));
            }
        }
        self.pending_feeds.push(PendingFeed {
            element,
            feed,
            interval,
        });
        Ok(())
    }

    /// Removes an element after cancelling the tasks that write to it.
    pub fn remove_element(&mut self, element: ElementId) -> Option<Element> {
        if let Some(handles) = self.tasks.remove(&element) {
            for handle in handles {
                handle.abort();
            }
        }
        self.pending_feeds.retain(|pending| pending.element != element);
        lock(&self.board).remove_element(element)
    }

    /// Number of live background tasks.
    pub fn task_count(&self) -> usize {
        self.tasks
            .values()
            .flatten()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    fn spawn_pulses(&mut self) {
        let pulses = lock(&self.board).pulse_generators();
        for (element, _) in pulses {
            if self.tasks.contains_key(&element) {
                continue;
            }
            let board = Arc::clone(&self.board);
            let handle = tokio::spawn(async move {
                loop {
                    let half_period = lock(&board)
                        .pulse_generators()
                        .into_iter()
                        .find(|(id, _)| *id == element)
                        .map(|(_, half_period)| half_period);
                    let Some(half_period) = half_period else {
                        break;
                    };
                    time::sleep(half_period).await;
                    if lock(&board).toggle(element).is_err() {
                        break;
                    }
                }
            });
            self.tasks.entry(element).or_default().push(handle);
        }
    }

    fn spawn_feeds(&mut self) {
        for pending in std::mem::take(&mut self.pending_feeds) {
            let PendingFeed {
                element,
                mut feed,
                interval,
            } = pending;
            let board = Arc::clone(&self.board);
            let handle = tokio::spawn(async move {
                let mut ticker = time::interval(interval);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    ticker.tick().await;
                    let sample = feed.sample();
                    let mut guard = lock(&board);
                    let Some(node) = guard.source_node(element) else {
                        break;
                    };
                    match sample {
                        Ok(volts) => {
                            guard.write_source(node, volts);
                            let _ = guard.mark_degraded(element, false);
                        }
                        Err(e) => {
                            warn!("Sensor feed for {} failed: {}", element, e);
                            let _ = guard.mark_degraded(element, true);
                            break;
                        }
                    }
                }
            });
            self.tasks.entry(element).or_default().push(handle);
        }
    }

    /// Ticks the board every period until stopped or `max_ticks` ticks have
    /// run. Returns the number of ticks run.
    pub async fn run(&mut self, max_ticks: Option<u64>) -> u64 {
        if max_ticks == Some(0) || !self.control.is_running() {
            return 0;
        }
        self.spawn_pulses();
        self.spawn_feeds();
        info!("Simulation started, tick period {:?}", self.tick_period);

        let mut ticker = time::interval(self.tick_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks = 0;
        loop {
            ticker.tick().await;
            if !self.control.is_running() {
                break;
            }
            if self.control.is_paused() {
                continue;
            }
            let tick = lock(&self.board).tick();
            ticks += 1;
            debug!("Tick {}", tick);
            if max_ticks.map_or(false, |max| ticks >= max) {
                break;
            }
        }

        self.control.stop();
        info!("Simulation stopped after {} ticks", ticks);
        ticks
    }
}

impl Drop for Simulator {
    fn drop(&mut self) {
        for handle in self.tasks.values().flatten() {
            handle.abort();
        }
    }
}
