//! Interactive turret bench simulation.
//!
//! Runs the full control stack against the simulated rig: aim converges
//! onto the configured hot target, the actuator fires once, and the mount
//! holds. Runs until interrupted.
//!
//! Usage:
//!   cargo run -p turret_sitl --bin turret_sim -- [OPTIONS]
//!
//! Options:
//!   --target-yaw <DEG>    Hot source yaw (default: 150)
//!   --target-pitch <DEG>  Hot source pitch (default: 5)
//!   --arm-delay <S>       Seconds between Enter and start (default: 5)
//!   --tick-ms <MS>        Scheduler tick length (default: 1)
//!   --status-ms <MS>      Status line interval (default: 500)
//!   --strict              Use the 5 degree acceptance window

use std::env;
use std::io::{self, BufRead, Write};
use std::process;
use std::time::Duration;

use turret_core::config::AcquisitionConfig;
use turret_sitl::{spawn_button_listener, RigConfig, TurretRig};

struct Args {
    target_yaw: f32,
    target_pitch: f32,
    arm_delay_s: u64,
    tick_ms: u64,
    status_ms: u64,
    strict: bool,
}

fn parse_args() -> Args {
    let mut args = Args {
        target_yaw: 150.0,
        target_pitch: 5.0,
        arm_delay_s: 5,
        tick_ms: 1,
        status_ms: 500,
        strict: false,
    };

    let raw: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < raw.len() {
        match raw[i].as_str() {
            "--target-yaw" => {
                i += 1;
                args.target_yaw = parse_f32_arg(&raw, i, "target-yaw");
            }
            "--target-pitch" => {
                i += 1;
                args.target_pitch = parse_f32_arg(&raw, i, "target-pitch");
            }
            "--arm-delay" => {
                i += 1;
                args.arm_delay_s = parse_u64_arg(&raw, i, "arm-delay");
            }
            "--tick-ms" => {
                i += 1;
                args.tick_ms = parse_u64_arg(&raw, i, "tick-ms").max(1);
            }
            "--status-ms" => {
                i += 1;
                args.status_ms = parse_u64_arg(&raw, i, "status-ms").max(1);
            }
            "--strict" => args.strict = true,
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown option: {other}");
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    args
}

fn parse_f32_arg(raw: &[String], i: usize, name: &str) -> f32 {
    raw.get(i)
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| {
            eprintln!("Error: --{name} needs a numeric value");
            process::exit(1);
        })
}

fn parse_u64_arg(raw: &[String], i: usize, name: &str) -> u64 {
    raw.get(i)
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| {
            eprintln!("Error: --{name} needs an integer value");
            process::exit(1);
        })
}

fn print_usage() {
    println!(
        "Usage: turret_sim [OPTIONS]\n\
         \x20 --target-yaw <DEG>    Hot source yaw (default: 150)\n\
         \x20 --target-pitch <DEG>  Hot source pitch (default: 5)\n\
         \x20 --arm-delay <S>       Seconds between Enter and start (default: 5)\n\
         \x20 --tick-ms <MS>        Scheduler tick length (default: 1)\n\
         \x20 --status-ms <MS>      Status line interval (default: 500)\n\
         \x20 --strict              Use the 5 degree acceptance window\n\
         \x20 -h, --help            Show this help"
    );
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = parse_args();

    println!("=== turret bench sim ===");
    println!(
        "Hot source at yaw {:.1} deg, pitch {:.1} deg",
        args.target_yaw, args.target_pitch
    );

    print!("Press enter to start: ");
    io::stdout().flush().expect("stdout");
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .expect("Failed to read stdin");

    if args.arm_delay_s > 0 {
        println!("Arming in {} s...", args.arm_delay_s);
        std::thread::sleep(Duration::from_secs(args.arm_delay_s));
    }

    let mut cfg = RigConfig {
        target_yaw_deg: args.target_yaw,
        target_pitch_deg: args.target_pitch,
        tick_ms: args.tick_ms,
        ..RigConfig::default()
    };
    if args.strict {
        cfg.acquisition = AcquisitionConfig::strict();
    }

    let mut rig = TurretRig::new(cfg);
    // A second Enter plays the user button interrupt.
    let _button = spawn_button_listener(rig.shares_handle());

    println!("Running. Press Ctrl+C to stop.\n");

    let mut interval = tokio::time::interval(Duration::from_millis(args.tick_ms));
    let mut last_status: u64 = 0;
    let mut reported_shot = false;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                println!("\nShutdown requested.");
                break;
            }
            _ = interval.tick() => {
                if let Err(e) = rig.step() {
                    // Collaborator faults are fatal: no retry, no
                    // degraded mode.
                    eprintln!("Fatal: {e}");
                    process::exit(1);
                }

                let status = rig.status();
                if status.fired && !reported_shot {
                    reported_shot = true;
                    println!("[{:>7} ms] dart away", status.now_ms);
                }
                if status.now_ms.saturating_sub(last_status) >= args.status_ms {
                    last_status = status.now_ms;
                    println!(
                        "[{:>7} ms] aim ({:7.2}, {:6.2}) deg -> desired ({:7.2}, {:6.2}) deg  on_target={} shots={}",
                        status.now_ms,
                        status.yaw_deg,
                        status.pitch_deg,
                        status.desired_yaw_deg,
                        status.desired_pitch_deg,
                        status.on_target,
                        status.shots,
                    );
                }
            }
        }
    }

    println!("Done");
}
