//! Dial thresholds

/// Number of duration dials.
pub const DIAL_COUNT: usize = 3;

/// Ascending duration thresholds in seconds (5 min, 30 min, 2 hours).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialThresholds(pub [f64; DIAL_COUNT]);

impl Default for DialThresholds {
    fn default() -> Self {
        Self([5.0 * 60.0, 30.0 * 60.0, 120.0 * 60.0])
    }
}

impl DialThresholds {
    /// Indices of thresholds `t` with `previous < t <= current`, ascending.
    pub fn crossed(&self, previous: f64, current: f64) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(move |&(_, &t)| previous < t && t <= current)
            .map(|(i, _)| i)
    }

    pub fn is_ascending(&self) -> bool {
        self.0[0] > 0.0 && self.0.windows(2).all(|pair| pair[0] < pair[1])
    }
}
