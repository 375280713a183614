use std::fmt;

use des::{Agent, Response};

use crate::{Event, Stats};

#[derive(Debug, Clone, PartialEq)]
pub enum TraceKind {
    Arrival { aircraft_id: usize },
    ServiceStart { aircraft_id: usize, liters: f64 },
    ServiceComplete { aircraft_id: usize, elapsed: f64 },
    LowLevel { percent: f64 },
    TruckCalled { truck_id: usize },
    TruckArrived { truck_id: usize },
    Refill { truck_id: usize, liters: f64 },
}

impl fmt::Display for TraceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceKind::Arrival { aircraft_id } => {
                write!(f, "Aircraft {aircraft_id} arriving at airport")
            }
            TraceKind::ServiceStart {
                aircraft_id,
                liters,
            } => write!(f, "Aircraft {aircraft_id} starts rewatering {liters:.1} liters"),
            TraceKind::ServiceComplete {
                aircraft_id,
                elapsed,
            } => write!(
                f,
                "Aircraft {aircraft_id} finished rewatering in {elapsed:.1} seconds"
            ),
            TraceKind::LowLevel { percent } => {
                write!(f, "Reservoir down to {percent:.1}% of capacity")
            }
            TraceKind::TruckCalled { truck_id } => write!(f, "Calling tank truck {truck_id}"),
            TraceKind::TruckArrived { truck_id } => write!(f, "Tank truck {truck_id} arriving"),
            TraceKind::Refill { truck_id, liters } => {
                write!(f, "Tank truck {truck_id} refuelling {liters:.1} liters")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TraceEntry {
    pub time: f64,
    pub kind: TraceKind,
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:>8.1}] {}", self.time, self.kind)
    }
}

/// Listens to every event and keeps the narration of the notable ones.
#[derive(Default)]
pub struct Narrator {
    entries: Vec<TraceEntry>,
}

impl Narrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    fn narrate(data: &Event) -> Option<TraceKind> {
        let kind = match data {
            Event::AircraftArrived { aircraft_id, .. } => TraceKind::Arrival {
                aircraft_id: *aircraft_id,
            },
            Event::WaterGranted {
                aircraft_id,
                liters,
                ..
            } => TraceKind::ServiceStart {
                aircraft_id: *aircraft_id,
                liters: *liters,
            },
            Event::AircraftDeparted {
                aircraft_id,
                elapsed,
            } => TraceKind::ServiceComplete {
                aircraft_id: *aircraft_id,
                elapsed: *elapsed,
            },
            Event::LowLevelAlert { percent, .. } => TraceKind::LowLevel { percent: *percent },
            Event::TruckDispatched { truck_id, .. } => TraceKind::TruckCalled {
                truck_id: *truck_id,
            },
            Event::TruckArrived { truck_id, .. } => TraceKind::TruckArrived {
                truck_id: *truck_id,
            },
            Event::Refilled {
                truck_id, liters, ..
            } => TraceKind::Refill {
                truck_id: *truck_id,
                liters: *liters,
            },
            _ => return None,
        };
        Some(kind)
    }
}

impl Agent<Event, Stats> for Narrator {
    fn act(&mut self, current_t: f64, data: &Event) -> Response<Event, Stats> {
        if let Some(kind) = Self::narrate(data) {
            self.entries.push(TraceEntry {
                time: current_t,
                kind,
            });
        }
        Response::new()
    }

    fn stats(&self) -> Stats {
        Stats::TraceStats(self.entries.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_only_notable_events() {
        let mut narrator = Narrator::new();

        narrator.act(0.0, &Event::Start);
        narrator.act(0.0, &Event::MonitorPoll { reservoir_id: 0 });
        narrator.act(
            12.0,
            &Event::AircraftArrived {
                aircraft_id: 0,
                liters: 900.0,
            },
        );
        narrator.act(
            12.0,
            &Event::SlotRequested {
                station_id: 0,
                aircraft_id: 0,
            },
        );

        assert_eq!(
            narrator.entries(),
            &[TraceEntry {
                time: 12.0,
                kind: TraceKind::Arrival { aircraft_id: 0 }
            }]
        );
    }

    #[test]
    fn entry_display_includes_time() {
        let entry = TraceEntry {
            time: 5_000.0,
            kind: TraceKind::ServiceComplete {
                aircraft_id: 2,
                elapsed: 5_000.0,
            },
        };

        assert_eq!(
            entry.to_string(),
            "[  5000.0] Aircraft 2 finished rewatering in 5000.0 seconds"
        );
    }
}
