//! Assembled bench rig.
//!
//! [`TurretRig`] wires the simulated peripherals into the real task
//! bodies, registers them with the scheduler in the bench order, and
//! owns the run loop: one scheduler tick per step, axis physics advanced
//! ahead of each dispatch cycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use turret_core::config::{
    AcquisitionConfig, AxisConfig, ACQUIRE_TASK, FIRE_TASK, INIT_TASK, PITCH_TASK, YAW_TASK,
};
use turret_core::scheduler::{Scheduler, Task};
use turret_core::share::{Axis, TurretShares};
use turret_core::tasks::{AxisTask, FireTask, InitTask, TargetAcquisitionTask};

use crate::error::SimError;
use crate::platform::axis::{shared, SharedAxis, SimAxisConfig};
use crate::platform::camera::{SimCameraConfig, SimThermalCamera};
use crate::platform::encoder::SimEncoder;
use crate::platform::motor::SimMotor;
use crate::platform::trigger::{SimTrigger, SimTriggerConfig};

/// Full rig configuration.
#[derive(Debug, Clone, Copy)]
pub struct RigConfig {
    pub yaw_axis: SimAxisConfig,
    pub pitch_axis: SimAxisConfig,
    pub yaw_control: AxisConfig,
    pub pitch_control: AxisConfig,
    pub camera: SimCameraConfig,
    pub trigger: SimTriggerConfig,
    pub acquisition: AcquisitionConfig,
    /// Where the simulated hot source sits.
    pub target_yaw_deg: f32,
    pub target_pitch_deg: f32,
    /// Scheduler tick length; the task periods assume 1 ms ticks.
    pub tick_ms: u64,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            yaw_axis: SimAxisConfig::yaw(),
            pitch_axis: SimAxisConfig::pitch(),
            yaw_control: AxisConfig::yaw(),
            pitch_control: AxisConfig::pitch(),
            camera: SimCameraConfig::default(),
            trigger: SimTriggerConfig::default(),
            acquisition: AcquisitionConfig::default(),
            target_yaw_deg: 150.0,
            target_pitch_deg: 5.0,
            tick_ms: 1,
        }
    }
}

/// Snapshot of the rig for status reporting and assertions.
#[derive(Debug, Clone, Copy)]
pub struct RigStatus {
    pub now_ms: u64,
    pub yaw_deg: f32,
    pub pitch_deg: f32,
    pub desired_yaw_deg: f32,
    pub desired_pitch_deg: f32,
    pub on_target: bool,
    pub fired: bool,
    pub captures: u32,
    pub shots: u32,
}

/// The whole bench: shares, tasks, scheduler and simulated hardware.
pub struct TurretRig {
    shares: Arc<TurretShares>,
    scheduler: Scheduler,
    init: InitTask,
    yaw: AxisTask<SimMotor, SimEncoder>,
    acquire: TargetAcquisitionTask<SimThermalCamera>,
    pitch: AxisTask<SimMotor, SimEncoder>,
    fire: FireTask<SimTrigger>,
    yaw_axis: SharedAxis,
    pitch_axis: SharedAxis,
    camera: SimThermalCamera,
    trigger: SimTrigger,
    tick_ms: u64,
    now: u64,
}

impl TurretRig {
    pub fn new(cfg: RigConfig) -> Self {
        let shares = Arc::new(TurretShares::new());

        let yaw_axis = shared(cfg.yaw_axis);
        let pitch_axis = shared(cfg.pitch_axis);

        let camera = SimThermalCamera::new(
            cfg.camera,
            yaw_axis.clone(),
            pitch_axis.clone(),
            cfg.target_yaw_deg,
            cfg.target_pitch_deg,
        );
        let trigger = SimTrigger::new(cfg.trigger);

        let yaw = AxisTask::new(
            Axis::Yaw,
            cfg.yaw_control,
            SimMotor::new(yaw_axis.clone()),
            SimEncoder::new(yaw_axis.clone()),
        );
        let pitch = AxisTask::new(
            Axis::Pitch,
            cfg.pitch_control,
            SimMotor::new(pitch_axis.clone()),
            SimEncoder::new(pitch_axis.clone()),
        );
        let acquire = TargetAcquisitionTask::new(cfg.acquisition, camera.clone());
        let fire = FireTask::new(trigger.clone());

        // Reference registration order; dispatch order is by priority.
        let mut scheduler: Scheduler = Scheduler::new();
        scheduler.register(INIT_TASK).unwrap();
        scheduler.register(YAW_TASK).unwrap();
        scheduler.register(ACQUIRE_TASK).unwrap();
        scheduler.register(PITCH_TASK).unwrap();
        scheduler.register(FIRE_TASK).unwrap();

        Self {
            shares,
            scheduler,
            init: InitTask,
            yaw,
            acquire,
            pitch,
            fire,
            yaw_axis,
            pitch_axis,
            camera,
            trigger,
            tick_ms: cfg.tick_ms,
            now: 0,
        }
    }

    /// Advance one scheduler tick: physics first, then one dispatch cycle.
    pub fn step(&mut self) -> Result<u32, SimError> {
        let dt_s = self.tick_ms as f32 / 1000.0;
        self.yaw_axis.borrow_mut().integrate(dt_s);
        self.pitch_axis.borrow_mut().integrate(dt_s);

        let mut tasks: [&mut dyn Task; 5] = [
            &mut self.init,
            &mut self.yaw,
            &mut self.acquire,
            &mut self.pitch,
            &mut self.fire,
        ];
        let steps = self
            .scheduler
            .dispatch_cycle(&mut tasks, &self.shares, self.now)?;
        self.now += self.tick_ms;
        Ok(steps)
    }

    /// Run until the stop flag is raised. The in-flight cycle always
    /// completes before the loop exits; a task error aborts immediately.
    pub fn run(&mut self, stop: &AtomicBool) -> Result<(), SimError> {
        while !stop.load(Ordering::Relaxed) {
            self.step()?;
            thread::sleep(Duration::from_millis(self.tick_ms));
        }
        Ok(())
    }

    pub fn shares(&self) -> &TurretShares {
        &self.shares
    }

    /// Clone of the share bundle for asynchronous producers (the button
    /// listener).
    pub fn shares_handle(&self) -> Arc<TurretShares> {
        self.shares.clone()
    }

    /// Elapsed scheduler ticks in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.now
    }

    /// Move the simulated hot source.
    pub fn set_target(&self, yaw_deg: f32, pitch_deg: f32) {
        self.camera.set_target(yaw_deg, pitch_deg);
    }

    pub fn status(&self) -> RigStatus {
        RigStatus {
            now_ms: self.now,
            yaw_deg: self.yaw_axis.borrow().angle_deg(),
            pitch_deg: self.pitch_axis.borrow().angle_deg(),
            desired_yaw_deg: self.shares.desired_yaw.get(),
            desired_pitch_deg: self.shares.desired_pitch.get(),
            on_target: self.shares.on_target.get(),
            fired: self.shares.fired.get(),
            captures: self.camera.captures(),
            shots: self.trigger.pulses(),
        }
    }
}
