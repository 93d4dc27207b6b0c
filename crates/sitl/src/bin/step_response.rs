//! Offline step-response check for one axis.
//!
//! Bench diagnostic: prompts for a proportional gain, commands a 90
//! degree step on the simulated yaw stage and prints time/position
//! samples as CSV for plotting. A non-numeric gain aborts the routine.
//!
//! Usage:
//!   cargo run -p turret_sitl --bin step_response

use std::io::{self, BufRead, Write};
use std::process;

use turret_core::config::AxisConfig;
use turret_core::controller::PController;
use turret_core::encoder::PositionTracker;
use turret_sitl::{SimAxis, SimAxisConfig};

const STEP_DEG: f32 = 90.0;
const SAMPLE_MS: u64 = 10;
const RUN_MS: u64 = 2000;

fn main() {
    println!("=== yaw axis step response ===");
    print!("Proportional gain Kp: ");
    io::stdout().flush().expect("stdout");

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .expect("Failed to read stdin");
    let gain: f32 = match line.trim().parse() {
        Ok(g) => g,
        Err(_) => {
            eprintln!("Invalid gain '{}'; aborting.", line.trim());
            process::exit(1);
        }
    };

    let geometry = AxisConfig::yaw().geometry;
    let mut axis = SimAxis::new(SimAxisConfig::yaw());
    let mut tracker = PositionTracker::new();
    let mut controller = PController::new(gain, geometry.ticks_from_degrees(STEP_DEG));

    println!("t_ms,position_deg");
    let mut t_ms: u64 = 0;
    while t_ms <= RUN_MS {
        let sample = tracker.sample(axis.counter());
        let duty = controller.output(sample.position as f32);
        axis.set_duty(duty);
        axis.integrate(SAMPLE_MS as f32 / 1000.0);

        let position_deg = geometry.degrees_from_ticks(sample.position as f32);
        println!("{t_ms},{position_deg:.3}");
        t_ms += SAMPLE_MS;
    }

    let final_deg = geometry.degrees_from_ticks(tracker.position() as f32);
    println!("# final position {final_deg:.2} deg (target {STEP_DEG} deg)");
}
