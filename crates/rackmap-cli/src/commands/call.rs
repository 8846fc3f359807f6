//! One-shot tool call.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use rackmap_api::{Envelope, Request, Response, TOOL_NAMES, dispatch};

use super::common::{Context, save_host};

#[derive(Args)]
pub struct CallArgs {
    /// Tool name, e.g. get_device_parameters
    tool: Option<String>,

    /// Tool parameters as a JSON object
    #[arg(default_value = "{}")]
    params: String,

    /// Save the resulting set here after a successful modifying call
    #[arg(long)]
    save: Option<PathBuf>,

    /// List tool names and exit
    #[arg(long)]
    list: bool,
}

pub fn run(args: CallArgs, ctx: &Context) -> anyhow::Result<()> {
    if args.list {
        for name in TOOL_NAMES {
            println!("{name}");
        }
        return Ok(());
    }
    let Some(tool) = args.tool else {
        anyhow::bail!("no tool given. Use 'rackmap call --list' to see available tools.");
    };

    let params = serde_json::from_str(&args.params)
        .with_context(|| format!("params is not valid JSON: {}", args.params))?;
    let (set, mut host) = ctx.open_host()?;

    let mut modified = false;
    let response = match Request::from_envelope(Envelope { tool, params }) {
        Ok(request) => {
            modified = request.is_modifying();
            Response::from_result(dispatch(&mut host, &request))
        }
        Err(e) => Response::from(e),
    };
    println!("{}", response.to_json(ctx.pretty()));

    match response {
        Response::Success { .. } => {
            if let Some(path) = args.save
                && modified
            {
                save_host(&host, &set.name, &path)?;
            }
            Ok(())
        }
        Response::Error { code, .. } => anyhow::bail!("tool call failed ({code})"),
    }
}
