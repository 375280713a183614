use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::trace;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DesError {
    #[error("cannot schedule an event at t={requested} before the current time t={now}")]
    EventInPast { now: f64, requested: f64 },
    #[error("event time {0} is not a finite number")]
    InvalidTime(f64),
    #[error("agent failed at t={time}: {reason}")]
    AgentFailed { time: f64, reason: String },
}

struct Event<T> {
    t: f64,
    seq: u64,
    data: T,
}

impl<T> PartialEq for Event<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Event<T> {}

impl<T> Ord for Event<T> {
    // BinaryHeap is a max-heap: invert so the earliest time (then the
    // earliest scheduled) sits on top.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .t
            .total_cmp(&self.t)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<T> PartialOrd for Event<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub struct Response<T, S> {
    pub events: Vec<(f64, T)>,
    pub agents: Vec<Box<dyn Agent<T, S>>>,
    pub failure: Option<String>,
}

impl<T, S> Default for Response<T, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S> Response<T, S> {
    pub fn new() -> Response<T, S> {
        Response {
            events: Vec::<(f64, T)>::new(),
            agents: Vec::<Box<dyn Agent<T, S>>>::new(),
            failure: None,
        }
    }

    pub fn event(t: f64, data: T) -> Response<T, S> {
        Response::events(vec![(t, data)])
    }

    pub fn events(events: Vec<(f64, T)>) -> Response<T, S> {
        Response {
            events,
            ..Response::new()
        }
    }

    /// Aborts the run. The loop surfaces `reason` as [`DesError::AgentFailed`].
    pub fn fail(reason: impl Into<String>) -> Response<T, S> {
        Response {
            failure: Some(reason.into()),
            ..Response::new()
        }
    }

    pub fn with_agent(mut self, agent: Box<dyn Agent<T, S>>) -> Response<T, S> {
        self.agents.push(agent);
        self
    }
}

/// A logical process driven by the event loop.
///
/// Every event is offered to every live agent; `act` is the point where a
/// suspended process resumes. Agents ignore events that are not addressed
/// to them by returning an empty [`Response`].
pub trait Agent<T, S> {
    fn act(&mut self, _current_t: f64, _data: &T) -> Response<T, S> {
        Response::new()
    }

    fn stats(&self) -> S;

    /// Finished agents are dropped from the loop after the current step.
    fn is_done(&self) -> bool {
        false
    }
}

pub struct EventLoop<T, S> {
    queue: BinaryHeap<Event<T>>,
    current_t: f64,
    next_seq: u64,
    agents: Vec<Box<dyn Agent<T, S>>>,
}

impl<T, S> EventLoop<T, S> {
    pub fn new(
        events: Vec<(f64, T)>,
        agents: Vec<Box<dyn Agent<T, S>>>,
    ) -> Result<EventLoop<T, S>, DesError> {
        let mut event_loop = EventLoop {
            queue: BinaryHeap::new(),
            current_t: 0.0,
            next_seq: 0,
            agents,
        };
        for (t, data) in events {
            event_loop.schedule(t, data)?;
        }
        Ok(event_loop)
    }

    pub fn current_t(&self) -> f64 {
        self.current_t
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Time of the earliest pending event.
    pub fn peek_t(&self) -> Option<f64> {
        self.queue.peek().map(|event| event.t)
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn schedule(&mut self, t: f64, data: T) -> Result<(), DesError> {
        if !t.is_finite() {
            return Err(DesError::InvalidTime(t));
        }
        if t < self.current_t {
            return Err(DesError::EventInPast {
                now: self.current_t,
                requested: t,
            });
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Event { t, seq, data });
        Ok(())
    }

    /// Processes the earliest pending event. Returns the new current time,
    /// or `None` once the queue is exhausted.
    pub fn step(&mut self) -> Result<Option<f64>, DesError> {
        let Some(event) = self.queue.pop() else {
            return Ok(None);
        };
        self.current_t = event.t;
        trace!(t = event.t, seq = event.seq, "broadcasting event");

        let mut scheduled = Vec::<(f64, T)>::new();
        let mut new_agents = Vec::<Box<dyn Agent<T, S>>>::new();
        for agent in &mut self.agents {
            let response = agent.act(self.current_t, &event.data);
            if let Some(reason) = response.failure {
                return Err(DesError::AgentFailed {
                    time: self.current_t,
                    reason,
                });
            }
            scheduled.extend(response.events);
            new_agents.extend(response.agents);
        }
        for (t, data) in scheduled {
            self.schedule(t, data)?;
        }
        self.agents.extend(new_agents);
        self.agents.retain(|agent| !agent.is_done());

        Ok(Some(self.current_t))
    }

    /// Runs until the queue empties or the next event is at or beyond
    /// `until`. Events left in the queue are abandoned.
    pub fn run(&mut self, until: f64) -> Result<(), DesError> {
        while let Some(next) = self.queue.peek() {
            if next.t >= until {
                self.current_t = self.current_t.max(until);
                break;
            }
            self.step()?;
        }
        Ok(())
    }

    pub fn stats(&self) -> Vec<S> {
        self.agents.iter().map(|agent| agent.stats()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoddyAgent {}

    impl Agent<u8, ()> for NoddyAgent {
        fn stats(&self) {}
    }

    #[test]
    fn min_queue() {
        let mut queue = BinaryHeap::<Event<u8>>::new();
        queue.push(Event::<u8> {
            t: 2.0,
            seq: 0,
            data: 2,
        });
        queue.push(Event::<u8> {
            t: 1.0,
            seq: 1,
            data: 1,
        });
        if let Some(first) = queue.peek() {
            assert_eq!(first.data, 1);
        }
    }

    #[test]
    fn equal_times_pop_in_scheduling_order() {
        let mut queue = BinaryHeap::<Event<u8>>::new();
        for (seq, data) in [(0, 10), (1, 11), (2, 12)] {
            queue.push(Event { t: 5.0, seq, data });
        }
        let order: Vec<u8> = std::iter::from_fn(|| queue.pop().map(|e| e.data)).collect();
        assert_eq!(order, vec![10, 11, 12]);
    }

    #[test]
    fn noddy_run() {
        let agents: Vec<Box<dyn Agent<u8, ()>>> = vec![Box::new(NoddyAgent {})];
        let mut event_loop = EventLoop::new(vec![(1.0, 1), (2.0, 2)], agents).unwrap();

        event_loop.run(f64::INFINITY).unwrap();

        assert_eq!(event_loop.current_t(), 2.0);
        assert_eq!(event_loop.pending(), 0);
    }

    #[test]
    fn new_agent() {
        struct SpawningAgent {}
        impl Agent<u8, ()> for SpawningAgent {
            fn act(&mut self, _current_t: f64, _data: &u8) -> Response<u8, ()> {
                Response::new().with_agent(Box::new(SpawningAgent {}))
            }
            fn stats(&self) {}
        }
        let agents: Vec<Box<dyn Agent<u8, ()>>> = vec![Box::new(SpawningAgent {})];
        let mut event_loop = EventLoop::new(vec![(1.0, 1), (2.0, 2)], agents).unwrap();

        event_loop.run(f64::INFINITY).unwrap();

        // First event: 1 new agent
        // Second event: 2 new agents
        assert_eq!(event_loop.agent_count(), 4)
    }

    #[test]
    fn horizon_abandons_later_events() {
        let agents: Vec<Box<dyn Agent<u8, ()>>> = vec![Box::new(NoddyAgent {})];
        let mut event_loop =
            EventLoop::new(vec![(1.0, 1), (10.0, 2), (20.0, 3)], agents).unwrap();

        event_loop.run(10.0).unwrap();

        assert_eq!(event_loop.current_t(), 10.0);
        assert_eq!(event_loop.pending(), 2, "event at the horizon is not processed");
    }

    #[test]
    fn scheduling_in_the_past_fails_fast() {
        struct LateAgent {}
        impl Agent<u8, ()> for LateAgent {
            fn act(&mut self, current_t: f64, _data: &u8) -> Response<u8, ()> {
                Response::event(current_t - 1.0, 0)
            }
            fn stats(&self) {}
        }
        let agents: Vec<Box<dyn Agent<u8, ()>>> = vec![Box::new(LateAgent {})];
        let mut event_loop = EventLoop::new(vec![(5.0, 1)], agents).unwrap();

        let err = event_loop.run(100.0).unwrap_err();

        assert_eq!(
            err,
            DesError::EventInPast {
                now: 5.0,
                requested: 4.0
            }
        );
    }

    #[test]
    fn non_finite_time_rejected() {
        let agents: Vec<Box<dyn Agent<u8, ()>>> = vec![Box::new(NoddyAgent {})];
        let result = EventLoop::new(vec![(f64::NAN, 1)], agents);
        assert!(matches!(result, Err(DesError::InvalidTime(_))));
    }

    #[test]
    fn agent_failure_aborts_run() {
        struct FailingAgent {}
        impl Agent<u8, ()> for FailingAgent {
            fn act(&mut self, _current_t: f64, data: &u8) -> Response<u8, ()> {
                if *data == 2 {
                    return Response::fail("bad request");
                }
                Response::new()
            }
            fn stats(&self) {}
        }
        let agents: Vec<Box<dyn Agent<u8, ()>>> = vec![Box::new(FailingAgent {})];
        let mut event_loop = EventLoop::new(vec![(1.0, 1), (3.0, 2), (4.0, 3)], agents).unwrap();

        let err = event_loop.run(100.0).unwrap_err();

        assert_eq!(
            err,
            DesError::AgentFailed {
                time: 3.0,
                reason: "bad request".to_string()
            }
        );
        assert_eq!(event_loop.pending(), 1);
    }

    #[test]
    fn finished_agents_are_retired() {
        struct OneShot {
            fired: bool,
        }
        impl Agent<u8, ()> for OneShot {
            fn act(&mut self, _current_t: f64, _data: &u8) -> Response<u8, ()> {
                self.fired = true;
                Response::new()
            }
            fn stats(&self) {}
            fn is_done(&self) -> bool {
                self.fired
            }
        }
        let agents: Vec<Box<dyn Agent<u8, ()>>> =
            vec![Box::new(OneShot { fired: false }), Box::new(NoddyAgent {})];
        let mut event_loop = EventLoop::new(vec![(1.0, 1)], agents).unwrap();

        assert_eq!(event_loop.step().unwrap(), Some(1.0));
        assert_eq!(event_loop.agent_count(), 1);
        assert_eq!(event_loop.step().unwrap(), None);
    }
}
