//! Compound device addresses.
//!
//! An [`Address`] names a device by position: a track index, a device index on
//! that track, then zero or more `(chain, device)` steps descending into racks.
//! Addresses are plain values. They carry no host state and are re-resolved on
//! every request.
//!
//! On the wire an address is a flat selector list, e.g. `[0, 1, 0, 2]` for
//! "track 0, device 1, chain 0, device 2".

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AddressError;

/// One descent into a rack: chain index, then device index within that chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChainStep {
    /// Chain index within the rack.
    pub chain: usize,
    /// Device index within the chain.
    pub device: usize,
}

/// Position of a device in the device tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "Vec<usize>", try_from = "Vec<usize>")]
pub struct Address {
    track: usize,
    device: usize,
    path: Vec<ChainStep>,
}

impl Address {
    /// Top-level device on a track.
    pub fn new(track: usize, device: usize) -> Self {
        Self {
            track,
            device,
            path: Vec::new(),
        }
    }

    /// Returns this address extended by one `(chain, device)` step.
    pub fn with_chain(mut self, chain: usize, device: usize) -> Self {
        self.path.push(ChainStep { chain, device });
        self
    }

    /// Builds an address from a flat selector list.
    ///
    /// The list must hold `track, device` followed by complete pairs.
    pub fn from_selectors(selectors: &[usize]) -> Result<Self, AddressError> {
        if selectors.len() < 2 || selectors.len() % 2 != 0 {
            return Err(AddressError::Malformed {
                len: selectors.len(),
            });
        }
        let path = selectors[2..]
            .chunks_exact(2)
            .map(|pair| ChainStep {
                chain: pair[0],
                device: pair[1],
            })
            .collect();
        Ok(Self {
            track: selectors[0],
            device: selectors[1],
            path,
        })
    }

    /// Track index.
    #[inline]
    pub fn track(&self) -> usize {
        self.track
    }

    /// Device index on the track.
    #[inline]
    pub fn device(&self) -> usize {
        self.device
    }

    /// Chain steps below the top-level device.
    #[inline]
    pub fn steps(&self) -> &[ChainStep] {
        &self.path
    }

    /// Number of rack levels descended (0 for a track-level device).
    #[inline]
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// The enclosing rack's address, or `None` for a track-level device.
    pub fn parent(&self) -> Option<Address> {
        if self.path.is_empty() {
            return None;
        }
        let mut parent = self.clone();
        parent.path.pop();
        Some(parent)
    }

    /// True if `self` sits somewhere inside the chains of the rack at `rack`.
    ///
    /// A rack is not within itself.
    pub fn is_within(&self, rack: &Address) -> bool {
        self.track == rack.track
            && self.device == rack.device
            && self.path.len() > rack.path.len()
            && self.path.starts_with(&rack.path)
    }

    /// Steps of `self` below `rack`, if `self` is within it.
    pub fn relative_to(&self, rack: &Address) -> Option<&[ChainStep]> {
        self.is_within(rack).then(|| &self.path[rack.path.len()..])
    }

    /// Flat selector list, the inverse of [`from_selectors`](Self::from_selectors).
    pub fn selectors(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(2 + self.path.len() * 2);
        out.push(self.track);
        out.push(self.device);
        for step in &self.path {
            out.push(step.chain);
            out.push(step.device);
        }
        out
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}/d{}", self.track, self.device)?;
        for step in &self.path {
            write!(f, "/c{}/d{}", step.chain, step.device)?;
        }
        Ok(())
    }
}

impl From<Address> for Vec<usize> {
    fn from(address: Address) -> Self {
        address.selectors()
    }
}

impl TryFrom<Vec<usize>> for Address {
    type Error = AddressError;

    fn try_from(selectors: Vec<usize>) -> Result<Self, Self::Error> {
        Address::from_selectors(&selectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_walks_every_step() {
        let addr = Address::new(0, 1).with_chain(0, 2).with_chain(3, 0);
        assert_eq!(addr.to_string(), "t0/d1/c0/d2/c3/d0");
    }

    #[test]
    fn from_selectors_rejects_odd_and_short_lists() {
        assert_eq!(
            Address::from_selectors(&[0]),
            Err(AddressError::Malformed { len: 1 })
        );
        assert_eq!(
            Address::from_selectors(&[0, 1, 2]),
            Err(AddressError::Malformed { len: 3 })
        );
        assert!(Address::from_selectors(&[0, 1, 2, 3]).is_ok());
    }

    #[test]
    fn within_requires_strict_descent() {
        let rack = Address::new(1, 0);
        let inside = rack.clone().with_chain(0, 0);
        let nested = inside.clone().with_chain(1, 1);

        assert!(inside.is_within(&rack));
        assert!(nested.is_within(&rack));
        assert!(nested.is_within(&inside));
        assert!(!rack.is_within(&rack));
        assert!(!Address::new(1, 1).with_chain(0, 0).is_within(&rack));
        assert!(!Address::new(0, 0).with_chain(0, 0).is_within(&rack));
    }

    #[test]
    fn relative_path_strips_rack_prefix() {
        let rack = Address::new(0, 0).with_chain(1, 1);
        let target = rack.clone().with_chain(2, 3);
        assert_eq!(
            target.relative_to(&rack),
            Some(&[ChainStep { chain: 2, device: 3 }][..])
        );
        assert_eq!(rack.relative_to(&target), None);
    }

    #[test]
    fn parent_pops_last_step() {
        let addr = Address::new(2, 3).with_chain(0, 1);
        assert_eq!(addr.parent(), Some(Address::new(2, 3)));
        assert_eq!(Address::new(2, 3).parent(), None);
    }

    #[test]
    fn serializes_as_flat_list() {
        let addr = Address::new(0, 1).with_chain(0, 2);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "[0,1,0,2]");
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
        assert!(serde_json::from_str::<Address>("[0,1,0]").is_err());
    }
}
