//! JSON-lines request loop.
//!
//! One request envelope per stdin line, one compact response per stdout
//! line. Blank lines are skipped. The loop ends at end of input.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use rackmap_api::{Request, Response, dispatch};

use super::common::{Context, save_host};

#[derive(Args)]
pub struct ServeArgs {
    /// Save the set here at end of input if any call changed it
    #[arg(long)]
    save: Option<PathBuf>,
}

pub fn run(args: ServeArgs, ctx: &Context) -> anyhow::Result<()> {
    let (set, mut host) = ctx.open_host()?;
    tracing::info!(set = %set.name, "serving JSON lines on stdin");

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let mut served = 0usize;
    let mut dirty = false;

    for line in stdin.lock().lines() {
        let line = line.context("failed to read request")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let response = match Request::from_json(line) {
            Ok(request) => {
                let response = Response::from_result(dispatch(&mut host, &request));
                dirty |= request.is_modifying() && response.is_success();
                response
            }
            Err(e) => Response::from(e),
        };
        writeln!(stdout, "{}", response.to_json(false))?;
        stdout.flush()?;
        served += 1;
    }
    tracing::info!(served, "end of input");

    if let Some(path) = args.save
        && dirty
    {
        save_host(&host, &set.name, &path)?;
    }
    Ok(())
}
