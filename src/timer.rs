// absorbs float error when deltas sum to exactly one interval
const TOLERANCE_SECONDS: f64 = 1e-9;

// accumulates host deltas, fires once per elapsed interval
#[derive(Debug)]
pub struct Cadence {
    interval: f64,
    elapsed: f64,
}

impl Cadence {
    pub fn from_hz(hz: f64) -> Self {
        Self {
            interval: 1.0 / hz,
            elapsed: 0.0,
        }
    }

    pub fn tick(&mut self, dt: f64) -> bool {
        self.elapsed += dt.max(0.0);
        if self.elapsed + TOLERANCE_SECONDS >= self.interval {
            self.reset();
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}

#[derive(Debug)]
pub struct Timer {
    pub count: u8,
    clock: Cadence,
}

impl Timer {
    pub fn new(init_count: u8, hz: f64) -> Self {
        Self {
            count: init_count,
            clock: Cadence::from_hz(hz),
        }
    }

    // loading restarts the phase of this timer only
    pub fn set(&mut self, value: u8) {
        self.count = value;
        self.clock.reset();
    }

    pub fn sync(&mut self, dt: f64) -> bool {
        if !self.clock.tick(dt) || self.count == 0 {
            return false;
        }
        self.count -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cadence_fires_on_interval() {
        let mut c = Cadence::from_hz(60.0);
        assert!(!c.tick(1.0 / 120.0));
        assert!(c.tick(1.0 / 120.0));
        assert!(!c.tick(0.0));
    }

    #[test]
    fn test_cadence_resets_instead_of_catching_up() {
        let mut c = Cadence::from_hz(60.0);
        assert!(c.tick(1.0));
        assert!(!c.tick(1.0 / 120.0));
    }

    #[test]
    fn test_timer_decrements_once_per_sixtieth() {
        let mut t = Timer::new(3, 60.0);
        for _ in 0..3 {
            t.sync(1.0 / 180.0);
        }
        assert_eq!(t.count, 2);
        assert!(t.sync(1.0 / 60.0));
        assert_eq!(t.count, 1);
    }

    #[test]
    fn test_timer_floors_at_zero() {
        let mut t = Timer::new(1, 60.0);
        assert!(t.sync(1.0 / 60.0));
        assert!(!t.sync(1.0 / 60.0));
        assert_eq!(t.count, 0);
    }

    #[test]
    fn test_set_restarts_phase() {
        let mut t = Timer::new(0, 60.0);
        t.sync(1.0 / 120.0);
        t.set(5);
        assert!(!t.sync(1.0 / 120.0));
        assert_eq!(t.count, 5);
        assert!(t.sync(1.0 / 120.0));
        assert_eq!(t.count, 4);
    }
}
