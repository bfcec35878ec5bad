mod config;
mod form;
mod ipc;
mod model;
mod roster;
mod store;

use std::io::{self, BufRead, Write};

fn main() {
    let cfg = match config::DaemonConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("academyd: {e:#}; using defaults");
            config::DaemonConfig::default()
        }
    };
    if let Err(e) = config::init_logging(&cfg) {
        eprintln!("academyd: {e:#}");
    }
    log::info!("academyd {} starting", env!("CARGO_PKG_VERSION"));

    let mut state = ipc::AppState::new(config::RosterSettings::default());

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(e) => {
                log::error!("stdin read failed: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let resp = match serde_json::from_str::<ipc::Request>(&line) {
            Ok(req) => ipc::handle_request(&mut state, req),
            Err(e) => {
                // No request id to echo back.
                log::warn!("bad request line: {}", e);
                ipc::err("", "bad_json", e.to_string(), None)
            }
        };
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }
    log::info!("stdin closed, exiting");
}
