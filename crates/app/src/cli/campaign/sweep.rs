use clap::Args;
use jiff::Timestamp;

use super::{DatabaseArgs, describe, table};

#[derive(Debug, Args)]
pub(crate) struct SweepArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Instant to sweep at, in RFC 3339; defaults to now
    #[arg(long)]
    at: Option<Timestamp>,
}

pub(crate) async fn run(args: SweepArgs) -> Result<(), String> {
    let service = args.database.service().await?;
    let now = args.at.unwrap_or_else(Timestamp::now);

    let report = service.sweep(now).await.map_err(|error| describe(&error))?;

    println!("{}", table::sweep(&report));

    if report.failed.is_empty() && report.unsynced.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "sweep at {now} left {} campaign(s) failed and {} needing reconcile",
            report.failed.len(),
            report.unsynced.len()
        ))
    }
}
