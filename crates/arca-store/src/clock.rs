use arca_types::Timestamp;

/// Source of `creationDate` and `timestamp` values.
pub trait Clock: Send {
    fn now(&mut self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&mut self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that starts at a fixed instant and moves forward by a fixed step
/// on every reading. Gives tests strictly increasing, reproducible times.
#[derive(Clone, Copy, Debug)]
pub struct ManualClock {
    next: Timestamp,
    step_millis: i64,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            next: start,
            step_millis: 1000,
        }
    }

    pub fn with_step(mut self, step_millis: i64) -> Self {
        self.step_millis = step_millis;
        self
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Timestamp::epoch())
    }
}

impl Clock for ManualClock {
    fn now(&mut self) -> Timestamp {
        let now = self.next;
        self.next = now.plus_millis(self.step_millis);
        now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_steps() {
        let mut clock = ManualClock::default().with_step(250);
        let a = clock.now();
        let b = clock.now();
        assert_eq!(a, Timestamp::epoch());
        assert_eq!(b.as_millis() - a.as_millis(), 250);
    }

    #[test]
    fn system_clock_is_recent() {
        assert!(SystemClock.now().as_millis() > 1_577_836_800_000);
    }
}
