use serde::{Deserialize, Serialize};

/// A preparation activity that precedes the test, in chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Grooming,
    Tacking,
    WarmUp,
}

impl Phase {
    /// Earliest first.
    pub const ALL: [Phase; 3] = [Phase::Grooming, Phase::Tacking, Phase::WarmUp];

    pub fn label(self) -> &'static str {
        match self {
            Phase::Grooming => "Grooming",
            Phase::Tacking => "Tacking",
            Phase::WarmUp => "Warm Up",
        }
    }
}

/// Phase durations in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepDurations {
    pub warm_up: u32,
    pub tacking: u32,
    pub grooming: u32,
}

impl PrepDurations {
    pub fn new(warm_up: u32, tacking: u32, grooming: u32) -> Self {
        Self {
            warm_up,
            tacking,
            grooming,
        }
    }

    pub fn get(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Grooming => self.grooming,
            Phase::Tacking => self.tacking,
            Phase::WarmUp => self.warm_up,
        }
    }

    /// Total preparation time. Widened so no combination of `u32` inputs overflows.
    pub fn total_min(&self) -> u64 {
        u64::from(self.warm_up) + u64::from(self.tacking) + u64::from(self.grooming)
    }
}

impl Default for PrepDurations {
    fn default() -> Self {
        Self {
            warm_up: 30,
            tacking: 10,
            grooming: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_durations_match_form_defaults() {
        let d = PrepDurations::default();
        assert_eq!((d.warm_up, d.tacking, d.grooming), (30, 10, 10));
        assert_eq!(d.total_min(), 50);
    }

    #[test]
    fn get_maps_each_phase() {
        let d = PrepDurations::new(1, 2, 3);
        assert_eq!(d.get(Phase::WarmUp), 1);
        assert_eq!(d.get(Phase::Tacking), 2);
        assert_eq!(d.get(Phase::Grooming), 3);
    }

    #[test]
    fn total_does_not_overflow() {
        let d = PrepDurations::new(u32::MAX, u32::MAX, u32::MAX);
        assert_eq!(d.total_min(), 3 * u64::from(u32::MAX));
    }
}
