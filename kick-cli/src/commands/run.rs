//! The `run` command: connect and print live stats.

use tracing::debug;

use crate::cli::RunArgs;
use crate::error::Result;
use crate::session::{self, SessionOptions};

pub async fn execute(args: RunArgs) -> Result<()> {
    let options = SessionOptions::from_args(args)?;
    let reason = session::run_session(options).await?;
    debug!(%reason, "session ended");
    Ok(())
}
