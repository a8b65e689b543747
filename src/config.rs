/// What `7XNN` does when the sum does not fit in a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddOverflow {
    /// keep the low 8 bits
    #[default]
    Wrap,
    /// halt with `VmError::ArithmeticOverflow`
    Fault,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// instructions executed per second (at most one per frame)
    pub instruction_hz: f64,
    pub timer_hz: f64,
    pub redraw_hz: f64,
    pub add_overflow: AddOverflow,
    /// fixed seed for CXNN, entropy when unset
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            instruction_hz: 240.0,
            timer_hz: 60.0,
            redraw_hz: 60.0,
            add_overflow: AddOverflow::Wrap,
            seed: None,
        }
    }
}

impl Config {
    pub fn with_instruction_hz(mut self, hz: f64) -> Self {
        self.instruction_hz = hz;
        self
    }

    pub fn with_add_overflow(mut self, policy: AddOverflow) -> Self {
        self.add_overflow = policy;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}
