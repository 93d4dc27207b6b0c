//! Simulated quadrature counter.

use turret_core::encoder::EncoderCounter;

use crate::platform::axis::SharedAxis;

/// Reads the free-running 16-bit count off one simulated axis.
pub struct SimEncoder {
    axis: SharedAxis,
}

impl SimEncoder {
    pub fn new(axis: SharedAxis) -> Self {
        Self { axis }
    }
}

impl EncoderCounter for SimEncoder {
    fn count(&mut self) -> u16 {
        self.axis.borrow().counter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::axis::{shared, SimAxisConfig};

    #[test]
    fn count_follows_the_axis() {
        let axis = shared(SimAxisConfig::yaw());
        let mut encoder = SimEncoder::new(axis.clone());
        assert_eq!(encoder.count(), 0);

        axis.borrow_mut().set_duty(100.0);
        axis.borrow_mut().integrate(0.1);
        assert_eq!(encoder.count(), axis.borrow().counter());
        assert!(encoder.count() > 0);
    }
}
