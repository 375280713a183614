use des::{Agent, Response};

use crate::{Event, Stats, TankTruckStats};

/// Single-shot replenishment: drive over, top the reservoir up, report back.
pub struct TankTruck {
    truck_id: usize,
    reservoir_id: usize,
    transit: f64,
    delivered: Option<f64>,
}

impl TankTruck {
    pub fn new(truck_id: usize, reservoir_id: usize, transit: f64) -> TankTruck {
        TankTruck {
            truck_id,
            reservoir_id,
            transit,
            delivered: None,
        }
    }

    fn owns(&self, truck_id: usize, reservoir_id: usize) -> bool {
        truck_id == self.truck_id && reservoir_id == self.reservoir_id
    }
}

impl Agent<Event, Stats> for TankTruck {
    fn act(&mut self, current_t: f64, data: &Event) -> Response<Event, Stats> {
        match data {
            Event::TruckDispatched {
                truck_id,
                reservoir_id,
            } if self.owns(*truck_id, *reservoir_id) => Response::event(
                current_t + self.transit,
                Event::TruckArrived {
                    truck_id: self.truck_id,
                    reservoir_id: self.reservoir_id,
                },
            ),
            Event::TruckArrived {
                truck_id,
                reservoir_id,
            } if self.owns(*truck_id, *reservoir_id) => Response::event(
                current_t,
                Event::TopUpRequested {
                    truck_id: self.truck_id,
                    reservoir_id: self.reservoir_id,
                },
            ),
            Event::Refilled {
                truck_id,
                reservoir_id,
                liters,
            } if self.owns(*truck_id, *reservoir_id) => {
                self.delivered = Some(*liters);
                Response::event(
                    current_t,
                    Event::ReplenishmentCompleted {
                        truck_id: self.truck_id,
                        reservoir_id: self.reservoir_id,
                    },
                )
            }
            _ => Response::new(),
        }
    }

    fn stats(&self) -> Stats {
        Stats::TankTruckStats(TankTruckStats {
            truck_id: self.truck_id,
            reservoir_id: self.reservoir_id,
            delivered: self.delivered,
        })
    }

    fn is_done(&self) -> bool {
        self.delivered.is_some()
    }
}
