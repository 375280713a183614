use std::collections::VecDeque;

use des::{Agent, Response};
use tracing::{debug, warn};

use crate::{Event, StationStats, Stats};

/// Bounded set of watering bays. Aircraft queue FIFO once every bay is
/// taken; a released bay is handed straight to the longest waiter.
pub struct Station {
    station_id: usize,
    capacity: usize,
    occupancy: usize,
    holders: Vec<usize>,
    waiting: VecDeque<usize>,
    total_acquired: usize,
}

impl Station {
    pub fn new(station_id: usize, capacity: usize) -> Station {
        Station {
            station_id,
            capacity,
            occupancy: 0,
            holders: Vec::with_capacity(capacity),
            waiting: VecDeque::new(),
            total_acquired: 0,
        }
    }

    pub fn occupancy(&self) -> usize {
        self.occupancy
    }

    pub fn queue_length(&self) -> usize {
        self.waiting.len()
    }

    /// Returns true if the aircraft got a bay now, false if it was queued.
    pub fn acquire(&mut self, aircraft_id: usize) -> bool {
        if self.occupancy < self.capacity {
            self.occupancy += 1;
            self.holders.push(aircraft_id);
            self.total_acquired += 1;
            true
        } else {
            self.waiting.push_back(aircraft_id);
            false
        }
    }

    /// Frees the aircraft's bay. Returns the waiter that inherits it, if any.
    pub fn release(&mut self, aircraft_id: usize) -> Option<usize> {
        let Some(position) = self.holders.iter().position(|id| *id == aircraft_id) else {
            warn!(
                station_id = self.station_id,
                aircraft_id, "release of a bay that is not held"
            );
            return None;
        };
        self.holders.swap_remove(position);

        match self.waiting.pop_front() {
            Some(next) => {
                // occupancy is unchanged: the bay moves directly to `next`
                self.holders.push(next);
                self.total_acquired += 1;
                Some(next)
            }
            None => {
                self.occupancy -= 1;
                None
            }
        }
    }
}

impl Agent<Event, Stats> for Station {
    fn act(&mut self, current_t: f64, data: &Event) -> Response<Event, Stats> {
        match data {
            Event::SlotRequested {
                station_id,
                aircraft_id,
            } if *station_id == self.station_id => {
                if self.acquire(*aircraft_id) {
                    Response::event(
                        current_t,
                        Event::SlotAcquired {
                            station_id: self.station_id,
                            aircraft_id: *aircraft_id,
                        },
                    )
                } else {
                    debug!(
                        t = current_t,
                        aircraft_id,
                        queue = self.waiting.len(),
                        "all bays busy"
                    );
                    Response::new()
                }
            }
            Event::SlotReleased {
                station_id,
                aircraft_id,
            } if *station_id == self.station_id => match self.release(*aircraft_id) {
                Some(next) => Response::event(
                    current_t,
                    Event::SlotAcquired {
                        station_id: self.station_id,
                        aircraft_id: next,
                    },
                ),
                None => Response::new(),
            },
            _ => Response::new(),
        }
    }

    fn stats(&self) -> Stats {
        Stats::StationStats(StationStats {
            station_id: self.station_id,
            capacity: self.capacity,
            occupancy: self.occupancy,
            queue_length: self.waiting.len(),
            total_acquired: self.total_acquired,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(aircraft_id: usize) -> Event {
        Event::SlotRequested {
            station_id: 0,
            aircraft_id,
        }
    }

    fn release(aircraft_id: usize) -> Event {
        Event::SlotReleased {
            station_id: 0,
            aircraft_id,
        }
    }

    #[test]
    fn free_bay_is_granted_immediately() {
        let mut station = Station::new(0, 2);

        let response = station.act(10.0, &request(42));

        assert_eq!(
            response.events,
            vec![(
                10.0,
                Event::SlotAcquired {
                    station_id: 0,
                    aircraft_id: 42
                }
            )]
        );
        assert_eq!(station.occupancy(), 1);
    }

    #[test]
    fn full_station_queues_request() {
        let mut station = Station::new(0, 1);
        station.act(10.0, &request(1));

        let response = station.act(15.0, &request(2));

        assert!(response.events.is_empty());
        assert_eq!(station.occupancy(), 1);
        assert_eq!(station.queue_length(), 1);
    }

    #[test]
    fn release_hands_bay_to_longest_waiter() {
        let mut station = Station::new(0, 1);
        station.act(10.0, &request(1));
        station.act(15.0, &request(2));
        station.act(17.0, &request(3));

        let response = station.act(25.0, &release(1));

        assert_eq!(
            response.events,
            vec![(
                25.0,
                Event::SlotAcquired {
                    station_id: 0,
                    aircraft_id: 2
                }
            )]
        );
        assert_eq!(station.occupancy(), 1, "bay passed on, not freed");
        assert_eq!(station.queue_length(), 1);

        // a newcomer cannot jump ahead of aircraft 3
        station.act(26.0, &request(4));
        let response = station.act(30.0, &release(2));
        assert!(matches!(
            response.events[0].1,
            Event::SlotAcquired { aircraft_id: 3, .. }
        ));
    }

    #[test]
    fn last_release_frees_bay() {
        let mut station = Station::new(0, 2);
        station.act(0.0, &request(1));

        let response = station.act(5.0, &release(1));

        assert!(response.events.is_empty());
        assert_eq!(station.occupancy(), 0);
    }

    #[test]
    fn release_without_holding_is_ignored() {
        let mut station = Station::new(0, 1);
        station.act(0.0, &request(1));

        station.act(5.0, &release(99));

        assert_eq!(station.occupancy(), 1);
    }

    #[test]
    fn events_for_other_stations_are_ignored() {
        let mut station = Station::new(0, 1);

        let response = station.act(
            10.0,
            &Event::SlotRequested {
                station_id: 1,
                aircraft_id: 42,
            },
        );

        assert!(response.events.is_empty());
        assert_eq!(station.occupancy(), 0);
    }
}
