//! Simulated firing actuator.
//!
//! Models the dart-pusher servo: extend pulse, fixed dwell, retract
//! pulse. The dwell really blocks, because the bench firmware really
//! blocks there; the whole control loop stalls for its duration.

use std::cell::RefCell;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use turret_core::trigger::{FireTrigger, TriggerError};

/// Servo pulse timing for one shot.
#[derive(Debug, Clone, Copy)]
pub struct SimTriggerConfig {
    /// Pulse width that pushes the dart into the flywheels.
    pub extend_pulse_us: u16,
    /// Pulse width of the rest position.
    pub retract_pulse_us: u16,
    /// Time the servo holds the extended position. 0 in tests.
    pub dwell_ms: u64,
}

impl Default for SimTriggerConfig {
    fn default() -> Self {
        Self {
            extend_pulse_us: 2000,
            retract_pulse_us: 800,
            dwell_ms: 250,
        }
    }
}

struct TriggerState {
    cfg: SimTriggerConfig,
    pulses: u32,
    last_pulse_us: Option<(u16, u16)>,
}

/// Cloneable handle onto one simulated actuator.
#[derive(Clone)]
pub struct SimTrigger {
    inner: Rc<RefCell<TriggerState>>,
}

impl SimTrigger {
    pub fn new(cfg: SimTriggerConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(TriggerState {
                cfg,
                pulses: 0,
                last_pulse_us: None,
            })),
        }
    }

    /// Completed firing pulses.
    pub fn pulses(&self) -> u32 {
        self.inner.borrow().pulses
    }

    /// (extend, retract) widths of the most recent pulse.
    pub fn last_pulse_us(&self) -> Option<(u16, u16)> {
        self.inner.borrow().last_pulse_us
    }
}

impl FireTrigger for SimTrigger {
    fn fire(&mut self) -> Result<(), TriggerError> {
        let mut state = self.inner.borrow_mut();
        let cfg = state.cfg;
        if cfg.dwell_ms > 0 {
            // The real firing sequence blocks here; the sim keeps the stall.
            thread::sleep(Duration::from_millis(cfg.dwell_ms));
        }
        state.last_pulse_us = Some((cfg.extend_pulse_us, cfg.retract_pulse_us));
        state.pulses += 1;
        Ok(())
    }
}
