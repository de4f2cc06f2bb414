//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `goaltrack_core` linkage.
//! - Walk one goal through add, check-off and a two-day progress check.
//!
//! Set `GOALTRACK_LOG_DIR` to an absolute path to also write log files.

use chrono::{Duration, Utc};
use goaltrack_core::{default_log_level, init_logging, InMemoryUserRepository, UserService};
use std::process::ExitCode;

fn main() -> ExitCode {
    // Why: keep a tiny CLI smoke run to validate core crate wiring independently from FFI setup.
    println!("goaltrack_core ping={}", goaltrack_core::ping());
    println!("goaltrack_core version={}", goaltrack_core::core_version());

    if let Ok(log_dir) = std::env::var("GOALTRACK_LOG_DIR") {
        if let Err(err) = init_logging(default_log_level().as_str(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    match run_smoke() {
        Ok(percentage) => {
            println!("goaltrack_core smoke=ok percentage={percentage:.1}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("goaltrack_core smoke=error {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_smoke() -> Result<f64, goaltrack_core::UserServiceError> {
    let service = UserService::new(InMemoryUserRepository::new());
    let user_id = service.register_user("smoke", "smoke", None)?;
    service.create_goal(user_id, "Run 5k")?;

    let t0 = Utc::now();
    service.check_off_goal_at(user_id, 0, t0)?;
    service.completion_percentage_at(user_id, 0, t0 + Duration::days(2))
}
