use crate::{DEFAULT_GAP_EXTEND, DEFAULT_GAP_OPEN};

/// Affine gap costs. Both are added to a score, so they are normally
/// zero or negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapPenalties {
    pub open: i32,
    pub extend: i32,
}

impl Default for GapPenalties {
    fn default() -> Self {
        Self {
            open: DEFAULT_GAP_OPEN,
            extend: DEFAULT_GAP_EXTEND,
        }
    }
}

impl GapPenalties {
    pub fn new(open: i32, extend: i32) -> Self {
        Self { open, extend }
    }

    pub fn with_open(mut self, open: i32) -> Self {
        self.open = open;
        self
    }

    pub fn with_extend(mut self, extend: i32) -> Self {
        self.extend = extend;
        self
    }

    /// Cost of the next gap step given whether the neighbour already sits
    /// in a gap running the same direction.
    pub fn cost(&self, extending: bool) -> i32 {
        if extending {
            self.extend
        } else {
            self.open
        }
    }

    pub(crate) fn warn_if_unusual(&self) {
        if self.open > 0 || self.extend > 0 {
            log::warn!(
                "Positive gap penalty (open={}, extend={}) rewards gaps",
                self.open,
                self.extend
            );
        }
        if self.open > self.extend {
            log::warn!(
                "Gap open ({}) is cheaper than gap extend ({})",
                self.open,
                self.extend
            );
        }
    }
}
