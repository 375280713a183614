use des::{Agent, Response};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Uniform};

use crate::{Aircraft, ArrivalStats, Config, Event, SimError, Stats};

/// Endless stream of aircraft. Each arrival is drawn a uniform integer
/// number of seconds after the previous one; the stream only stops when
/// the event loop reaches its horizon.
pub struct ArrivalGenerator {
    station_id: usize,
    reservoir_id: usize,
    tank_size: u32,
    servicing_rate: f64,
    next_aircraft_id: usize,
    rng: StdRng,
    arrival_interval: Uniform<u32>,
    tank_level: Uniform<u32>,
}

impl ArrivalGenerator {
    pub fn new(
        config: &Config,
        station_id: usize,
        reservoir_id: usize,
    ) -> Result<ArrivalGenerator, SimError> {
        // keeps `tank_size - level` from underflowing
        config.validate()?;
        let (min_gap, max_gap) = config.arrival_interval;
        let arrival_interval = Uniform::new_inclusive(min_gap, max_gap)
            .map_err(|e| SimError::config(format!("arrival interval: {e}")))?;
        let (min_level, max_level) = config.tank_level_range;
        let tank_level = Uniform::new_inclusive(min_level, max_level)
            .map_err(|e| SimError::config(format!("tank level range: {e}")))?;

        Ok(ArrivalGenerator {
            station_id,
            reservoir_id,
            tank_size: config.tank_size,
            servicing_rate: config.servicing_rate,
            next_aircraft_id: 0,
            rng: StdRng::seed_from_u64(config.seed),
            arrival_interval,
            tank_level,
        })
    }

    fn draw_arrival_interval(&mut self) -> f64 {
        f64::from(self.arrival_interval.sample(&mut self.rng))
    }

    /// Liters an aircraft is missing from a full tank.
    fn draw_liters_required(&mut self) -> f64 {
        let level = self.tank_level.sample(&mut self.rng);
        f64::from(self.tank_size - level)
    }
}

impl Agent<Event, Stats> for ArrivalGenerator {
    fn act(&mut self, current_t: f64, data: &Event) -> Response<Event, Stats> {
        match data {
            Event::Start => {
                Response::event(current_t + self.draw_arrival_interval(), Event::ArrivalDue)
            }
            Event::ArrivalDue => {
                let aircraft_id = self.next_aircraft_id;
                self.next_aircraft_id += 1;
                let next_arrival = current_t + self.draw_arrival_interval();
                let liters = self.draw_liters_required();
                let aircraft = Aircraft::new(
                    aircraft_id,
                    self.station_id,
                    self.reservoir_id,
                    liters,
                    self.servicing_rate,
                );
                Response::events(vec![
                    (
                        current_t,
                        Event::AircraftArrived {
                            aircraft_id,
                            liters,
                        },
                    ),
                    (next_arrival, Event::ArrivalDue),
                ])
                .with_agent(Box::new(aircraft))
            }
            _ => Response::new(),
        }
    }

    fn stats(&self) -> Stats {
        Stats::ArrivalStats(ArrivalStats {
            spawned: self.next_aircraft_id,
        })
    }
}
