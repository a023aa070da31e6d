//! Rolling angle window for jitter suppression
//!
//! Stores the last 15 values of one joint angle.

/// Number of frames kept per joint
pub const HISTORY_SIZE: usize = 15;

/// Fixed-capacity FIFO of angle samples
#[derive(Debug, Clone)]
pub struct AngleWindow {
    /// Circular buffer data
    data: [f32; HISTORY_SIZE],

    /// Current write position (points to next slot to write)
    write_index: usize,

    /// Whether buffer has been filled at least once
    filled: bool,
}

impl AngleWindow {
    pub fn new() -> Self {
        Self {
            data: [0.0; HISTORY_SIZE],
            write_index: 0,
            filled: false,
        }
    }

    /// Push a new sample, evicting the oldest once full
    pub fn push(&mut self, angle: f32) {
        self.data[self.write_index] = angle;
        self.write_index = (self.write_index + 1) % HISTORY_SIZE;

        // Mark as filled when we wrap around
        if self.write_index == 0 {
            self.filled = true;
        }
    }

    /// Number of samples currently held
    pub fn len(&self) -> usize {
        if self.filled {
            HISTORY_SIZE
        } else {
            self.write_index
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mean of the held samples, 0 when empty
    pub fn mean(&self) -> f32 {
        let len = self.len();
        if len == 0 {
            return 0.0;
        }
        self.data[..len].iter().sum::<f32>() / len as f32
    }

    pub fn clear(&mut self) {
        self.data = [0.0; HISTORY_SIZE];
        self.write_index = 0;
        self.filled = false;
    }
}

impl Default for AngleWindow {
    fn default() -> Self {
        Self::new()
    }
}
