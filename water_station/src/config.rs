use crate::SimError;

/// Compiled-in parameters of one watering-station run.
///
/// Quantities are liters, times are seconds of virtual time.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // Station
    pub station_slots: usize,

    // Reservoir
    pub reservoir_capacity: f64,
    pub initial_level: f64,
    pub threshold_percent: f64,
    pub poll_interval: f64,

    // Aircraft
    pub tank_size: u32,
    pub tank_level_range: (u32, u32),
    pub servicing_rate: f64,
    pub arrival_interval: (u32, u32),

    // Tank truck
    pub truck_transit: f64,

    // Run
    pub sim_time: f64,
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            station_slots: 2,

            reservoir_capacity: 17_000.0, // ten aircraft tanks
            initial_level: 17_000.0,
            threshold_percent: 10.0,
            poll_interval: 10.0,

            tank_size: 1_700,
            tank_level_range: (50, 1_500),
            servicing_rate: 0.2,
            arrival_interval: (30, 300),

            truck_transit: 300.0,

            sim_time: 1_000.0,
            seed: 42,
        }
    }
}

impl Config {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_sim_time(mut self, sim_time: f64) -> Self {
        self.sim_time = sim_time;
        self
    }

    pub fn with_station_slots(mut self, slots: usize) -> Self {
        self.station_slots = slots;
        self
    }

    pub fn with_reservoir(mut self, capacity: f64, initial_level: f64) -> Self {
        self.reservoir_capacity = capacity;
        self.initial_level = initial_level;
        self
    }

    pub fn with_threshold_percent(mut self, percent: f64) -> Self {
        self.threshold_percent = percent;
        self
    }

    pub fn with_poll_interval(mut self, seconds: f64) -> Self {
        self.poll_interval = seconds;
        self
    }

    pub fn with_tank(mut self, tank_size: u32, level_range: (u32, u32)) -> Self {
        self.tank_size = tank_size;
        self.tank_level_range = level_range;
        self
    }

    pub fn with_servicing_rate(mut self, liters_per_second: f64) -> Self {
        self.servicing_rate = liters_per_second;
        self
    }

    pub fn with_arrival_interval(mut self, min: u32, max: u32) -> Self {
        self.arrival_interval = (min, max);
        self
    }

    pub fn with_truck_transit(mut self, seconds: f64) -> Self {
        self.truck_transit = seconds;
        self
    }

    /// The largest deficit an arriving aircraft can have.
    pub fn max_liters_required(&self) -> f64 {
        f64::from(self.tank_size.saturating_sub(self.tank_level_range.0))
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.station_slots == 0 {
            return Err(SimError::config("station needs at least one slot"));
        }
        if !(self.reservoir_capacity.is_finite() && self.reservoir_capacity > 0.0) {
            return Err(SimError::config(format!(
                "reservoir capacity must be positive, got {}",
                self.reservoir_capacity
            )));
        }
        if !(0.0..=self.reservoir_capacity).contains(&self.initial_level) {
            return Err(SimError::config(format!(
                "initial level {} outside [0, {}]",
                self.initial_level, self.reservoir_capacity
            )));
        }
        if !(0.0..=100.0).contains(&self.threshold_percent) {
            return Err(SimError::config(format!(
                "threshold {}% outside [0, 100]",
                self.threshold_percent
            )));
        }
        if !(self.poll_interval.is_finite() && self.poll_interval > 0.0) {
            return Err(SimError::config("poll interval must be positive"));
        }
        let (min_level, max_level) = self.tank_level_range;
        if min_level > max_level {
            return Err(SimError::config(format!(
                "tank level range [{min_level}, {max_level}] is inverted"
            )));
        }
        // every aircraft must be missing at least one liter
        if max_level >= self.tank_size {
            return Err(SimError::config(format!(
                "tank level {max_level} leaves no deficit in a tank of {}",
                self.tank_size
            )));
        }
        // A request larger than the reservoir could never be served.
        if self.max_liters_required() > self.reservoir_capacity {
            return Err(SimError::config(format!(
                "an aircraft may need {} liters but the reservoir only holds {}",
                self.max_liters_required(),
                self.reservoir_capacity
            )));
        }
        if !(self.servicing_rate.is_finite() && self.servicing_rate > 0.0) {
            return Err(SimError::config("servicing rate must be positive"));
        }
        let (min_gap, max_gap) = self.arrival_interval;
        if min_gap > max_gap {
            return Err(SimError::config(format!(
                "arrival interval [{min_gap}, {max_gap}] is inverted"
            )));
        }
        if !(self.truck_transit.is_finite() && self.truck_transit >= 0.0) {
            return Err(SimError::config("truck transit delay must be non-negative"));
        }
        if self.sim_time.is_nan() || self.sim_time < 0.0 {
            return Err(SimError::config("simulation horizon must be non-negative"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
        assert_eq!(Config::default().max_liters_required(), 1_650.0);
    }

    #[test]
    fn deficit_larger_than_reservoir_is_rejected() {
        let config = Config::default().with_reservoir(1_000.0, 1_000.0);
        assert!(matches!(
            config.validate(),
            Err(SimError::Configuration(_))
        ));
    }

    #[test]
    fn initial_level_above_capacity_is_rejected() {
        let config = Config::default().with_reservoir(17_000.0, 17_001.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_ranges_are_rejected() {
        assert!(Config::default().with_arrival_interval(300, 30).validate().is_err());
        assert!(Config::default().with_tank(1_700, (1_500, 50)).validate().is_err());
    }

    #[test]
    fn full_tank_level_is_rejected() {
        let config = Config::default().with_tank(1_700, (1_700, 1_700));
        assert!(matches!(
            config.validate(),
            Err(SimError::Configuration(_))
        ));
        assert!(Config::default().with_tank(1_700, (50, 1_699)).validate().is_ok());
    }

    #[test]
    fn negative_transit_is_rejected() {
        assert!(Config::default().with_truck_transit(-1.0).validate().is_err());
    }

    #[test]
    fn zero_rate_and_zero_slots_are_rejected() {
        assert!(Config::default().with_servicing_rate(0.0).validate().is_err());
        assert!(Config::default().with_station_slots(0).validate().is_err());
    }
}
