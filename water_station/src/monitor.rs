use des::{Agent, Response};
use tracing::{debug, info};

use crate::{Event, MonitorStats, Stats, TankTruck};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Polling,
    Dispatching,
    AwaitingReplenishment,
}

/// Station control: samples the reservoir every poll interval and calls a
/// tank truck when the fill ratio drops below the threshold.
///
/// The reservoir sampled and the reservoir refilled are the same one,
/// named by `reservoir_id`. While a truck is on its way no sampling
/// happens, so there is never more than one truck in flight.
pub struct Monitor {
    reservoir_id: usize,
    threshold_percent: f64,
    poll_interval: f64,
    truck_transit: f64,
    state: MonitorState,
    next_truck_id: usize,
    awaiting: Option<usize>,
    polls: usize,
    dispatches: usize,
}

impl Monitor {
    pub fn new(
        reservoir_id: usize,
        threshold_percent: f64,
        poll_interval: f64,
        truck_transit: f64,
    ) -> Monitor {
        Monitor {
            reservoir_id,
            threshold_percent,
            poll_interval,
            truck_transit,
            state: MonitorState::Polling,
            next_truck_id: 0,
            awaiting: None,
            polls: 0,
            dispatches: 0,
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    fn next_poll(&self, current_t: f64) -> Response<Event, Stats> {
        Response::event(
            current_t + self.poll_interval,
            Event::MonitorPoll {
                reservoir_id: self.reservoir_id,
            },
        )
    }

    fn dispatch(&mut self, current_t: f64, percent: f64) -> Response<Event, Stats> {
        self.state = MonitorState::Dispatching;
        let truck_id = self.next_truck_id;
        self.next_truck_id += 1;
        self.dispatches += 1;
        info!(
            t = current_t,
            reservoir_id = self.reservoir_id,
            truck_id,
            percent,
            "reservoir below threshold, calling tank truck"
        );

        let truck = TankTruck::new(truck_id, self.reservoir_id, self.truck_transit);
        self.awaiting = Some(truck_id);
        self.state = MonitorState::AwaitingReplenishment;

        Response::events(vec![
            (
                current_t,
                Event::LowLevelAlert {
                    reservoir_id: self.reservoir_id,
                    percent,
                },
            ),
            (
                current_t,
                Event::TruckDispatched {
                    truck_id,
                    reservoir_id: self.reservoir_id,
                },
            ),
        ])
        .with_agent(Box::new(truck))
    }
}

impl Agent<Event, Stats> for Monitor {
    fn act(&mut self, current_t: f64, data: &Event) -> Response<Event, Stats> {
        match (self.state, data) {
            (MonitorState::Polling, Event::Start) => Response::event(
                current_t,
                Event::MonitorPoll {
                    reservoir_id: self.reservoir_id,
                },
            ),
            (MonitorState::Polling, Event::MonitorPoll { reservoir_id })
                if *reservoir_id == self.reservoir_id =>
            {
                self.polls += 1;
                Response::event(
                    current_t,
                    Event::LevelSampleRequested {
                        reservoir_id: self.reservoir_id,
                    },
                )
            }
            (
                MonitorState::Polling,
                Event::LevelSampled {
                    reservoir_id,
                    level,
                    capacity,
                },
            ) if *reservoir_id == self.reservoir_id => {
                let percent = level / capacity * 100.0;
                debug!(t = current_t, percent, "reservoir sampled");
                if percent < self.threshold_percent {
                    self.dispatch(current_t, percent)
                } else {
                    self.next_poll(current_t)
                }
            }
            (
                MonitorState::AwaitingReplenishment,
                Event::ReplenishmentCompleted {
                    truck_id,
                    reservoir_id,
                },
            ) if *reservoir_id == self.reservoir_id && self.awaiting == Some(*truck_id) => {
                self.awaiting = None;
                self.state = MonitorState::Polling;
                self.next_poll(current_t)
            }
            _ => Response::new(),
        }
    }

    fn stats(&self) -> Stats {
        Stats::MonitorStats(MonitorStats {
            reservoir_id: self.reservoir_id,
            state: self.state,
            polls: self.polls,
            dispatches: self.dispatches,
            trucks_in_flight: usize::from(self.awaiting.is_some()),
        })
    }
}
