//! Command-line interface.

pub mod commands;
pub mod output;
pub mod types;

pub use types::{ClearField, Cli, Commands};

use crate::domain::DomainError;

/// Report a command failure and exit with a non-zero status.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    let retryable = err
        .downcast_ref::<DomainError>()
        .is_some_and(DomainError::is_write_failure);

    if json_mode {
        let body = serde_json::json!({
            "success": false,
            "error": format!("{err:#}"),
            "retryable": retryable,
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err:#}");
        if retryable {
            eprintln!("The change was not saved. Fix the problem and run the command again.");
        }
    }
    std::process::exit(1);
}
