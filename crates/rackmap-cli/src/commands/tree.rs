//! Device tree printout.

use clap::Args;
use rackmap_core::{DeviceHandle, LiveHost, SimHost, chain_devices, resolve_chain, track_devices};
use rackmap_macros::macro_slots;
use rackmap_registry::list_parameters;

use super::common::Context;

#[derive(Args)]
pub struct TreeArgs {
    /// Include every device's parameters
    #[arg(short, long)]
    parameters: bool,

    /// Only print this track
    #[arg(short, long)]
    track: Option<usize>,
}

pub fn run(args: TreeArgs, ctx: &Context) -> anyhow::Result<()> {
    let (set, host) = ctx.open_host()?;

    println!("Set: {}", set.name);
    println!("{}", "=".repeat(5 + set.name.len()));

    let count = host.track_count()?;
    if let Some(track) = args.track
        && track >= count
    {
        anyhow::bail!("track {track} out of range (set has {count} tracks)");
    }

    for track in 0..count {
        if args.track.is_some_and(|t| t != track) {
            continue;
        }
        let info = host.track_info(track)?;
        println!();
        println!("[{track}] {} ({:?})", info.name, info.kind);
        for device in track_devices(&host, track)? {
            print_device(&host, &device, 1, args.parameters)?;
        }
    }
    Ok(())
}

fn print_device(
    host: &SimHost,
    device: &DeviceHandle,
    depth: usize,
    parameters: bool,
) -> anyhow::Result<()> {
    let pad = "  ".repeat(depth);
    println!(
        "{pad}{} {} <{}> {}",
        device.address(),
        device.name(),
        device.class_name(),
        device.kind()
    );

    if parameters {
        for p in list_parameters(host, device)? {
            let flags = match (p.is_enabled, p.is_quantized) {
                (false, _) => " [read-only]",
                (true, true) => " [quantized]",
                (true, false) => "",
            };
            println!(
                "{pad}    #{:<3} {:24} {} [{}, {}]{flags}",
                p.index, p.name, p.value, p.min, p.max
            );
        }
    }

    if !device.is_rack() {
        return Ok(());
    }

    for slot in macro_slots(host, device)? {
        for m in &slot.mappings {
            println!(
                "{pad}  macro {} '{}' -> {} '{}' #{} {}",
                slot.index.get(),
                slot.parameter.name,
                m.target_address,
                m.target_device_name,
                m.target_parameter_index,
                m.target_parameter_name
            );
        }
    }

    for index in 0..host.device_chains(device.id())?.len() {
        let chain = resolve_chain(host, device.address(), index)?;
        println!("{pad}  chain {index}: {}", chain.name);
        for child in chain_devices(host, &chain)? {
            print_device(host, &child, depth + 2, parameters)?;
        }
    }
    Ok(())
}
