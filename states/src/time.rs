use chrono::{DateTime, Duration, Utc};

/// The clock every freshness decision reads from.
///
/// The app ticks it to wall time once per frame. A frozen clock ignores ticks and only moves
/// through [`Time::advance`], which keeps cache expiry deterministic in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Time {
    virt: DateTime<Utc>,
    frozen: bool,
}

impl Default for Time {
    fn default() -> Self {
        Self {
            virt: Utc::now(),
            frozen: false,
        }
    }
}

impl Time {
    pub fn frozen(at: DateTime<Utc>) -> Self {
        Self {
            virt: at,
            frozen: true,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.virt
    }

    pub fn tick(&mut self) {
        if !self.frozen {
            self.virt = Utc::now();
        }
    }

    pub fn advance(&mut self, by: Duration) {
        self.virt += by;
    }
}
