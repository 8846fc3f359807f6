//! Device-tree resolver.
//!
//! Walks an [`Address`] from the set's track list down through racks and
//! chains, asking the host for the current layout at every level. Failures
//! name the exact selector that broke and the range that was available.
//!
//! Handles are snapshots: they hold the device's host id plus the
//! classification seen at resolution time. Nothing here is cached, so
//! resolving the same address twice against unchanged host state yields
//! equal handles, and resolving after a structural edit sees the edit.

use crate::address::Address;
use crate::classify::{DeviceClass, DeviceKind, DeviceRole, classify};
use crate::error::{AddressError, Result};
use crate::host::{ChainId, DeviceId, LiveHost, RawDevice};

/// Transient reference to a resolved device.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceHandle {
    id: DeviceId,
    kind: DeviceKind,
    class: DeviceClass,
    role: DeviceRole,
    address: Address,
    name: String,
    class_name: String,
}

impl DeviceHandle {
    fn from_raw(raw: RawDevice, address: Address) -> Self {
        Self {
            id: raw.id,
            kind: classify(&raw),
            class: DeviceClass::from_class_name(&raw.class_name),
            role: raw.role,
            address,
            name: raw.name,
            class_name: raw.class_name,
        }
    }

    /// Host object id.
    #[inline]
    pub fn id(&self) -> DeviceId {
        self.id
    }

    /// Native, plugin or rack.
    #[inline]
    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    /// Parsed host class.
    #[inline]
    pub fn class(&self) -> DeviceClass {
        self.class
    }

    /// Signal-chain role.
    #[inline]
    pub fn role(&self) -> DeviceRole {
        self.role
    }

    /// Address the handle was resolved from.
    #[inline]
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Display name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Host class name.
    #[inline]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Shorthand for `kind() == DeviceKind::Rack`.
    #[inline]
    pub fn is_rack(&self) -> bool {
        self.kind == DeviceKind::Rack
    }

    /// Shorthand for `kind() == DeviceKind::Plugin`.
    #[inline]
    pub fn is_plugin(&self) -> bool {
        self.kind == DeviceKind::Plugin
    }

    /// Fails with [`AddressError::NotARack`] unless this handle is a rack.
    pub fn require_rack(&self) -> Result<&Self> {
        if self.is_rack() {
            Ok(self)
        } else {
            Err(AddressError::NotARack {
                address: self.address.clone(),
                kind: self.kind,
            }
            .into())
        }
    }
}

/// Transient reference to one chain of a rack.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainHandle {
    /// Host object id.
    pub id: ChainId,
    /// Chain index within the rack.
    pub index: usize,
    /// Chain name.
    pub name: String,
    /// The owning rack.
    pub rack: DeviceHandle,
}

/// Resolves an address to a device handle.
pub fn resolve<H: LiveHost + ?Sized>(host: &H, address: &Address) -> Result<DeviceHandle> {
    let devices = track_device_ids(host, address.track())?;
    let id = *devices
        .get(address.device())
        .ok_or_else(|| AddressError::DeviceNotFound {
            index: address.device(),
            count: devices.len(),
            container: format!("track {}", address.track()),
        })?;
    let mut current = DeviceHandle::from_raw(
        host.device(id)?,
        Address::new(address.track(), address.device()),
    );
    #[cfg(feature = "tracing")]
    tracing::trace!("resolve: {} -> {} ({})", current.address, current.id, current.kind);

    for step in address.steps() {
        let chain = chain_at(host, &current, step.chain)?;
        let devices = host.chain_devices(chain)?;
        let id = *devices
            .get(step.device)
            .ok_or_else(|| AddressError::DeviceNotFound {
                index: step.device,
                count: devices.len(),
                container: format!("chain {} of rack {}", step.chain, current.address),
            })?;
        let next = current.address.clone().with_chain(step.chain, step.device);
        current = DeviceHandle::from_raw(host.device(id)?, next);
        #[cfg(feature = "tracing")]
        tracing::trace!("resolve: {} -> {} ({})", current.address, current.id, current.kind);
    }
    Ok(current)
}

/// Resolves a rack address plus chain index to a chain handle.
pub fn resolve_chain<H: LiveHost + ?Sized>(
    host: &H,
    rack: &Address,
    chain_index: usize,
) -> Result<ChainHandle> {
    let rack = resolve(host, rack)?;
    let id = chain_at(host, &rack, chain_index)?;
    let raw = host.chain(id)?;
    Ok(ChainHandle {
        id,
        index: chain_index,
        name: raw.name,
        rack,
    })
}

/// Devices of a chain, with their full addresses.
pub fn chain_devices<H: LiveHost + ?Sized>(
    host: &H,
    chain: &ChainHandle,
) -> Result<Vec<DeviceHandle>> {
    host.chain_devices(chain.id)?
        .into_iter()
        .enumerate()
        .map(|(i, id)| {
            let address = chain.rack.address.clone().with_chain(chain.index, i);
            Ok(DeviceHandle::from_raw(host.device(id)?, address))
        })
        .collect()
}

/// Top-level devices of a track.
pub fn track_devices<H: LiveHost + ?Sized>(host: &H, track: usize) -> Result<Vec<DeviceHandle>> {
    track_device_ids(host, track)?
        .into_iter()
        .enumerate()
        .map(|(i, id)| Ok(DeviceHandle::from_raw(host.device(id)?, Address::new(track, i))))
        .collect()
}

/// Every device nested anywhere inside a rack, depth first.
///
/// Returns an empty list for devices that are not racks.
pub fn subtree<H: LiveHost + ?Sized>(host: &H, rack: &DeviceHandle) -> Result<Vec<DeviceHandle>> {
    let mut out = Vec::new();
    collect_subtree(host, rack, &mut out)?;
    Ok(out)
}

fn collect_subtree<H: LiveHost + ?Sized>(
    host: &H,
    rack: &DeviceHandle,
    out: &mut Vec<DeviceHandle>,
) -> Result<()> {
    if !rack.is_rack() {
        return Ok(());
    }
    for (c, chain) in host.device_chains(rack.id)?.into_iter().enumerate() {
        for (d, id) in host.chain_devices(chain)?.into_iter().enumerate() {
            let handle =
                DeviceHandle::from_raw(host.device(id)?, rack.address.clone().with_chain(c, d));
            out.push(handle.clone());
            collect_subtree(host, &handle, out)?;
        }
    }
    Ok(())
}

fn track_device_ids<H: LiveHost + ?Sized>(host: &H, track: usize) -> Result<Vec<DeviceId>> {
    let count = host.track_count()?;
    if track >= count {
        return Err(AddressError::TrackNotFound {
            index: track,
            count,
        }
        .into());
    }
    Ok(host.track_devices(track)?)
}

fn chain_at<H: LiveHost + ?Sized>(
    host: &H,
    rack: &DeviceHandle,
    chain_index: usize,
) -> Result<ChainId> {
    rack.require_rack()?;
    let chains = host.device_chains(rack.id)?;
    chains
        .get(chain_index)
        .copied()
        .ok_or_else(|| {
            AddressError::ChainNotFound {
                index: chain_index,
                count: chains.len(),
            }
            .into()
        })
}
