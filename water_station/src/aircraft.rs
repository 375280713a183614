use des::{Agent, Response};
use tracing::debug;

use crate::{AircraftStats, Event, Stats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AircraftState {
    Arrived,
    WaitingForSlot,
    WaitingForWater,
    Servicing,
    Done,
}

/// One aircraft's visit: take a bay, draw its deficit from the reservoir,
/// fill up at the servicing rate, leave.
///
/// The bay stays held while the aircraft waits for water.
pub struct Aircraft {
    aircraft_id: usize,
    station_id: usize,
    reservoir_id: usize,
    liters: f64,
    servicing_rate: f64,
    state: AircraftState,
    arrived_at: Option<f64>,
    service_started_at: Option<f64>,
}

impl Aircraft {
    pub fn new(
        aircraft_id: usize,
        station_id: usize,
        reservoir_id: usize,
        liters: f64,
        servicing_rate: f64,
    ) -> Aircraft {
        Aircraft {
            aircraft_id,
            station_id,
            reservoir_id,
            liters,
            servicing_rate,
            state: AircraftState::Arrived,
            arrived_at: None,
            service_started_at: None,
        }
    }

    pub fn state(&self) -> AircraftState {
        self.state
    }

    pub fn service_duration(&self) -> f64 {
        self.liters / self.servicing_rate
    }

    fn transition(&mut self, current_t: f64, next: AircraftState) {
        debug!(
            t = current_t,
            aircraft_id = self.aircraft_id,
            from = ?self.state,
            to = ?next,
            "aircraft state change"
        );
        self.state = next;
    }
}

impl Agent<Event, Stats> for Aircraft {
    fn act(&mut self, current_t: f64, data: &Event) -> Response<Event, Stats> {
        match (self.state, data) {
            (AircraftState::Arrived, Event::AircraftArrived { aircraft_id, .. })
                if *aircraft_id == self.aircraft_id =>
            {
                self.arrived_at = Some(current_t);
                self.transition(current_t, AircraftState::WaitingForSlot);
                Response::event(
                    current_t,
                    Event::SlotRequested {
                        station_id: self.station_id,
                        aircraft_id: self.aircraft_id,
                    },
                )
            }
            (
                AircraftState::WaitingForSlot,
                Event::SlotAcquired {
                    station_id,
                    aircraft_id,
                },
            ) if *station_id == self.station_id && *aircraft_id == self.aircraft_id => {
                self.transition(current_t, AircraftState::WaitingForWater);
                Response::event(
                    current_t,
                    Event::WaterRequested {
                        reservoir_id: self.reservoir_id,
                        aircraft_id: self.aircraft_id,
                        liters: self.liters,
                    },
                )
            }
            (
                AircraftState::WaitingForWater,
                Event::WaterGranted {
                    reservoir_id,
                    aircraft_id,
                    ..
                },
            ) if *reservoir_id == self.reservoir_id && *aircraft_id == self.aircraft_id => {
                self.service_started_at = Some(current_t);
                self.transition(current_t, AircraftState::Servicing);
                Response::event(
                    current_t + self.service_duration(),
                    Event::ServicingFinished {
                        aircraft_id: self.aircraft_id,
                    },
                )
            }
            (AircraftState::Servicing, Event::ServicingFinished { aircraft_id })
                if *aircraft_id == self.aircraft_id =>
            {
                self.transition(current_t, AircraftState::Done);
                let elapsed = current_t - self.arrived_at.unwrap_or(current_t);
                Response::events(vec![
                    (
                        current_t,
                        Event::SlotReleased {
                            station_id: self.station_id,
                            aircraft_id: self.aircraft_id,
                        },
                    ),
                    (
                        current_t,
                        Event::AircraftDeparted {
                            aircraft_id: self.aircraft_id,
                            elapsed,
                        },
                    ),
                ])
            }
            _ => Response::new(),
        }
    }

    fn stats(&self) -> Stats {
        Stats::AircraftStats(AircraftStats {
            aircraft_id: self.aircraft_id,
            state: self.state,
            liters: self.liters,
            arrived_at: self.arrived_at,
            service_started_at: self.service_started_at,
        })
    }

    fn is_done(&self) -> bool {
        self.state == AircraftState::Done
    }
}
