// ============================================================================
// Modules
// ============================================================================

pub mod aircraft;
pub mod arrivals;
pub mod config;
pub mod error;
pub mod monitor;
pub mod narrator;
pub mod reservoir;
pub mod simulation;
pub mod station;
pub mod tank_truck;

pub use aircraft::{Aircraft, AircraftState};
pub use arrivals::ArrivalGenerator;
pub use config::Config;
pub use error::SimError;
pub use monitor::{Monitor, MonitorState};
pub use narrator::{Narrator, TraceEntry, TraceKind};
pub use reservoir::{Deposit, Reservoir};
pub use simulation::Simulation;
pub use station::Station;
pub use tank_truck::TankTruck;

// ============================================================================
// Events
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Start,

    // Arrival stream
    ArrivalDue,
    AircraftArrived {
        aircraft_id: usize,
        liters: f64,
    },

    // Station slots
    SlotRequested {
        station_id: usize,
        aircraft_id: usize,
    },
    SlotAcquired {
        station_id: usize,
        aircraft_id: usize,
    },
    SlotReleased {
        station_id: usize,
        aircraft_id: usize,
    },

    // Reservoir withdrawals
    WaterRequested {
        reservoir_id: usize,
        aircraft_id: usize,
        liters: f64,
    },
    WaterGranted {
        reservoir_id: usize,
        aircraft_id: usize,
        liters: f64,
    },

    // Servicing
    ServicingFinished {
        aircraft_id: usize,
    },
    AircraftDeparted {
        aircraft_id: usize,
        elapsed: f64,
    },

    // Level monitoring
    MonitorPoll {
        reservoir_id: usize,
    },
    LevelSampleRequested {
        reservoir_id: usize,
    },
    LevelSampled {
        reservoir_id: usize,
        level: f64,
        capacity: f64,
    },
    LowLevelAlert {
        reservoir_id: usize,
        percent: f64,
    },

    // Replenishment
    TruckDispatched {
        truck_id: usize,
        reservoir_id: usize,
    },
    TruckArrived {
        truck_id: usize,
        reservoir_id: usize,
    },
    TopUpRequested {
        truck_id: usize,
        reservoir_id: usize,
    },
    Refilled {
        truck_id: usize,
        reservoir_id: usize,
        liters: f64,
    },
    ReplenishmentCompleted {
        truck_id: usize,
        reservoir_id: usize,
    },
}

// ============================================================================
// Stats
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Stats {
    StationStats(StationStats),
    ReservoirStats(ReservoirStats),
    AircraftStats(AircraftStats),
    MonitorStats(MonitorStats),
    TankTruckStats(TankTruckStats),
    ArrivalStats(ArrivalStats),
    TraceStats(Vec<TraceEntry>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StationStats {
    pub station_id: usize,
    pub capacity: usize,
    pub occupancy: usize,
    pub queue_length: usize,
    pub total_acquired: usize,
}

impl StationStats {
    pub fn is_at_capacity(&self) -> bool {
        self.occupancy == self.capacity
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReservoirStats {
    pub reservoir_id: usize,
    pub capacity: f64,
    pub level: f64,
    pub queue_length: usize,
    pub total_withdrawn: f64,
    pub total_deposited: f64,
}

impl ReservoirStats {
    pub fn fill_percent(&self) -> f64 {
        self.level / self.capacity * 100.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AircraftStats {
    pub aircraft_id: usize,
    pub state: AircraftState,
    pub liters: f64,
    pub arrived_at: Option<f64>,
    pub service_started_at: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonitorStats {
    pub reservoir_id: usize,
    pub state: MonitorState,
    pub polls: usize,
    pub dispatches: usize,
    pub trucks_in_flight: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TankTruckStats {
    pub truck_id: usize,
    pub reservoir_id: usize,
    pub delivered: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrivalStats {
    pub spawned: usize,
}
