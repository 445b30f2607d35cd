// src/workload.rs

//! The built-in demo workload run by the `reloader` binary.

use std::time::Duration;

use tracing::info;

/// Line printed on stdout once the workload is running.
pub const STARTED_LINE: &str = "workload started";

/// Print [`STARTED_LINE`], then log a heartbeat every `every` forever.
pub fn heartbeat(every: Duration) {
    println!("{STARTED_LINE} (pid {})", std::process::id());

    let mut beats: u64 = 0;
    loop {
        std::thread::sleep(every);
        beats += 1;
        info!(beats, "workload heartbeat");
    }
}
