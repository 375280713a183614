use std::collections::VecDeque;

use des::{Agent, Response};
use tracing::{debug, warn};

use crate::{Event, ReservoirStats, SimError, Stats};

/// Outcome of a deposit: the liters that fit and the queued withdrawals it
/// unblocked, in queue order.
#[derive(Debug, Clone, PartialEq)]
pub struct Deposit {
    pub accepted: f64,
    pub granted: Vec<(usize, f64)>,
}

/// Finite store of water shared by every bay.
///
/// Withdrawals wait in strict arrival order: the head of the queue must be
/// served before anyone behind it, even when a later request would fit.
pub struct Reservoir {
    reservoir_id: usize,
    capacity: f64,
    level: f64,
    waiting: VecDeque<(usize, f64)>,
    total_withdrawn: f64,
    total_deposited: f64,
}

impl Reservoir {
    /// An `initial_level` outside `[0, capacity]` is clamped with a warning;
    /// `Config::validate` rejects such levels before a run is built.
    pub fn new(reservoir_id: usize, capacity: f64, initial_level: f64) -> Reservoir {
        let level = initial_level.clamp(0.0, capacity);
        if level != initial_level {
            warn!(
                reservoir_id,
                initial_level, capacity, "initial level outside capacity, clamped"
            );
        }
        Reservoir {
            reservoir_id,
            capacity,
            level,
            waiting: VecDeque::new(),
            total_withdrawn: 0.0,
            total_deposited: 0.0,
        }
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn queue_length(&self) -> usize {
        self.waiting.len()
    }

    /// Requests `liters` for an aircraft. `Ok(true)` means the water was
    /// drawn now, `Ok(false)` that the request joined the queue.
    pub fn withdraw(&mut self, aircraft_id: usize, liters: f64) -> Result<bool, SimError> {
        if !(liters > 0.0 && liters <= self.capacity) {
            return Err(SimError::config(format!(
                "aircraft {aircraft_id} requested {liters} liters from a reservoir of {}",
                self.capacity
            )));
        }
        if self.waiting.is_empty() && self.level >= liters {
            self.draw(liters);
            Ok(true)
        } else {
            self.waiting.push_back((aircraft_id, liters));
            Ok(false)
        }
    }

    /// Adds water, clamping at capacity, then serves the queue from its head
    /// for as long as the head fits.
    pub fn deposit(&mut self, liters: f64) -> Deposit {
        let liters = liters.max(0.0);
        let room = self.capacity - self.level;
        let accepted = if liters > room {
            warn!(
                reservoir_id = self.reservoir_id,
                liters, room, "deposit exceeds capacity, clamped"
            );
            room
        } else {
            liters
        };
        self.level += accepted;
        self.total_deposited += accepted;
        Deposit {
            accepted,
            granted: self.release_waiters(),
        }
    }

    fn release_waiters(&mut self) -> Vec<(usize, f64)> {
        let mut granted = Vec::new();
        while let Some(&(aircraft_id, liters)) = self.waiting.front() {
            if self.level < liters {
                break;
            }
            self.waiting.pop_front();
            self.draw(liters);
            granted.push((aircraft_id, liters));
        }
        granted
    }

    fn draw(&mut self, liters: f64) {
        self.level -= liters;
        self.total_withdrawn += liters;
    }

    fn granted(&self, aircraft_id: usize, liters: f64) -> Event {
        Event::WaterGranted {
            reservoir_id: self.reservoir_id,
            aircraft_id,
            liters,
        }
    }
}

impl Agent<Event, Stats> for Reservoir {
    fn act(&mut self, current_t: f64, data: &Event) -> Response<Event, Stats> {
        match data {
            Event::WaterRequested {
                reservoir_id,
                aircraft_id,
                liters,
            } if *reservoir_id == self.reservoir_id => {
                match self.withdraw(*aircraft_id, *liters) {
                    Ok(true) => Response::event(current_t, self.granted(*aircraft_id, *liters)),
                    Ok(false) => {
                        debug!(
                            t = current_t,
                            aircraft_id,
                            liters,
                            level = self.level,
                            "waiting for water"
                        );
                        Response::new()
                    }
                    Err(err) => Response::fail(err.to_string()),
                }
            }
            Event::LevelSampleRequested { reservoir_id } if *reservoir_id == self.reservoir_id => {
                Response::event(
                    current_t,
                    Event::LevelSampled {
                        reservoir_id: self.reservoir_id,
                        level: self.level,
                        capacity: self.capacity,
                    },
                )
            }
            Event::TopUpRequested {
                truck_id,
                reservoir_id,
            } if *reservoir_id == self.reservoir_id => {
                let deposit = self.deposit(self.capacity - self.level);
                let mut events = vec![(
                    current_t,
                    Event::Refilled {
                        truck_id: *truck_id,
                        reservoir_id: self.reservoir_id,
                        liters: deposit.accepted,
                    },
                )];
                events.extend(
                    deposit
                        .granted
                        .into_iter()
                        .map(|(aircraft_id, liters)| (current_t, self.granted(aircraft_id, liters))),
                );
                Response::events(events)
            }
            _ => Response::new(),
        }
    }

    fn stats(&self) -> Stats {
        Stats::ReservoirStats(ReservoirStats {
            reservoir_id: self.reservoir_id,
            capacity: self.capacity,
            level: self.level,
            queue_length: self.waiting.len(),
            total_withdrawn: self.total_withdrawn,
            total_deposited: self.total_deposited,
        })
    }
}
