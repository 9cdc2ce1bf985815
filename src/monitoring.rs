//! Monitoring - Utilizzo di CPU e memoria del processo del servizio
//!
//! Campiona il solo processo corrente a intervalli configurabili e logga
//! tramite `tracing`. Pensato come task in background lanciato dal main.

use std::time::Duration;
use sysinfo::{Pid, ProcessesToUpdate, System};
use tokio::time;
use tracing::{info, warn};

/// Task in background: logga CPU e memoria del processo ogni
/// `interval_secs` secondi. Non termina mai.
pub async fn start_process_monitoring(interval_secs: u64) {
    info!(
        "Starting process monitoring with interval: {} seconds",
        interval_secs
    );

    let mut sys = System::new_all();
    let current_pid = Pid::from_u32(std::process::id());

    let mut interval = time::interval(Duration::from_secs(interval_secs));

    // Il primo tick scatta subito e misurerebbe un delta nullo.
    interval.tick().await;

    loop {
        interval.tick().await;

        sys.refresh_processes(ProcessesToUpdate::Some(&[current_pid]), true);

        match sys.process(current_pid) {
            Some(process) => {
                let memory_mb = process.memory() as f64 / (1024.0 * 1024.0);
                info!(
                    "Process stats - CPU: {:.2}% | Memory: {:.2} MB",
                    process.cpu_usage(),
                    memory_mb
                );
            }
            None => warn!("Process {} not found during monitoring", current_pid),
        }
    }
}
