use des::{Agent, EventLoop};
use tracing::info;

use crate::{
    ArrivalGenerator, Config, Event, Monitor, MonitorStats, Narrator, Reservoir, ReservoirStats,
    SimError, Station, StationStats, Stats, TraceEntry,
};

const STATION_ID: usize = 0;
const RESERVOIR_ID: usize = 0;

/// One watering-station run: the clock, both shared resources and every
/// process live in a single event loop built from a validated [`Config`].
pub struct Simulation {
    config: Config,
    event_loop: EventLoop<Event, Stats>,
}

impl Simulation {
    pub fn new(config: Config) -> Result<Simulation, SimError> {
        config.validate()?;

        let agents: Vec<Box<dyn Agent<Event, Stats>>> = vec![
            Box::new(Narrator::new()),
            Box::new(Station::new(STATION_ID, config.station_slots)),
            Box::new(Reservoir::new(
                RESERVOIR_ID,
                config.reservoir_capacity,
                config.initial_level,
            )),
            Box::new(Monitor::new(
                RESERVOIR_ID,
                config.threshold_percent,
                config.poll_interval,
                config.truck_transit,
            )),
            Box::new(ArrivalGenerator::new(&config, STATION_ID, RESERVOIR_ID)?),
        ];
        let event_loop = EventLoop::new(vec![(0.0, Event::Start)], agents)?;

        Ok(Simulation { config, event_loop })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn now(&self) -> f64 {
        self.event_loop.current_t()
    }

    /// Runs to the configured horizon and returns the narration.
    pub fn run(&mut self) -> Result<Vec<TraceEntry>, SimError> {
        info!(
            sim_time = self.config.sim_time,
            seed = self.config.seed,
            "starting simulation"
        );
        self.event_loop.run(self.config.sim_time)?;
        info!(
            t = self.now(),
            pending = self.event_loop.pending(),
            "horizon reached"
        );
        Ok(self.trace())
    }

    /// Processes one event, unless the next one lies at or past the horizon.
    pub fn step(&mut self) -> Result<Option<f64>, SimError> {
        match self.event_loop.peek_t() {
            Some(t) if t < self.config.sim_time => Ok(self.event_loop.step()?),
            _ => Ok(None),
        }
    }

    pub fn stats(&self) -> Vec<Stats> {
        self.event_loop.stats()
    }

    pub fn trace(&self) -> Vec<TraceEntry> {
        self.stats()
            .into_iter()
            .find_map(|s| match s {
                Stats::TraceStats(entries) => Some(entries),
                _ => None,
            })
            .unwrap_or_default()
    }

    pub fn station_stats(&self) -> Option<StationStats> {
        self.stats().into_iter().find_map(|s| match s {
            Stats::StationStats(stats) => Some(stats),
            _ => None,
        })
    }

    pub fn reservoir_stats(&self) -> Option<ReservoirStats> {
        self.stats().into_iter().find_map(|s| match s {
            Stats::ReservoirStats(stats) => Some(stats),
            _ => None,
        })
    }

    pub fn monitor_stats(&self) -> Option<MonitorStats> {
        self.stats().into_iter().find_map(|s| match s {
            Stats::MonitorStats(stats) => Some(stats),
            _ => None,
        })
    }

    /// Tank trucks currently on the road or unloading.
    pub fn trucks_active(&self) -> usize {
        self.stats()
            .iter()
            .filter(|s| matches!(s, Stats::TankTruckStats(_)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_is_rejected_before_running() {
        let config = Config::default().with_reservoir(500.0, 500.0);

        let result = Simulation::new(config);

        assert!(matches!(result, Err(SimError::Configuration(_))));
    }

    #[test]
    fn run_stops_at_horizon() {
        let mut sim = Simulation::new(Config::default()).unwrap();

        sim.run().unwrap();

        assert_eq!(sim.now(), 1_000.0);
        assert_eq!(sim.step().unwrap(), None);
    }

    #[test]
    fn default_run_narrates_arrivals() {
        let mut sim = Simulation::new(Config::default()).unwrap();

        let trace = sim.run().unwrap();

        // at most one arrival every 30 s, at least one every 300 s
        let arrivals = trace
            .iter()
            .filter(|e| matches!(e.kind, crate::TraceKind::Arrival { .. }))
            .count();
        assert!((3..=33).contains(&arrivals), "got {arrivals} arrivals");
        assert!(trace.windows(2).all(|w| w[0].time <= w[1].time));
    }
}
