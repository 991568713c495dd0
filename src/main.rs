use std::time::Duration;

use anyhow::Result;
use tasbih::{cli::run_cli, utils::runtime::single_thread_runtime};
use tracing::error;

fn main() -> Result<()> {
    let runtime = single_thread_runtime()?;
    let result = runtime.block_on(run_cli()).inspect_err(|e| {
        error!("Error running cli {e:?}");
    });
    // Reading stdin parks a blocking thread that only returns on the next line. Don't wait for
    // it once watch is done.
    runtime.shutdown_timeout(Duration::from_millis(100));
    result
}
