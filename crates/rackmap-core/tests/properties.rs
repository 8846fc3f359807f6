//! Property-based tests for rackmap-core.
//!
//! Random device trees and random addresses: resolution must be
//! deterministic, succeed exactly for addresses inside the tree, and report
//! the first failing selector otherwise.

use proptest::prelude::*;
use rackmap_core::sim::{Container, DeviceSpec};
use rackmap_core::{
    Address, AddressError, DeviceClass, ParamRange, RackError, SimHost, TrackKind, ValueScale,
    resolve,
};

/// Flat layout: `tracks[t][d]` is the chain count of the device (0 means a plugin).
fn build(layout: &[Vec<usize>]) -> SimHost {
    let mut host = SimHost::new();
    for (t, devices) in layout.iter().enumerate() {
        host.add_track(format!("Track {t}"), TrackKind::Audio);
        for (d, &chains) in devices.iter().enumerate() {
            if chains == 0 {
                host.push_device(Container::Track(t), DeviceSpec::plugin(format!("P{t}.{d}")))
                    .unwrap();
            } else {
                let rack = host
                    .push_device(
                        Container::Track(t),
                        DeviceSpec::rack(DeviceClass::AudioEffectRack, format!("R{t}.{d}")),
                    )
                    .unwrap();
                for c in 0..chains {
                    let chain = host.add_chain(rack, format!("C{c}")).unwrap();
                    host.push_device(Container::Chain(chain), DeviceSpec::plugin("Leaf"))
                        .unwrap();
                }
            }
        }
    }
    host
}

fn layout_strategy() -> impl Strategy<Value = Vec<Vec<usize>>> {
    prop::collection::vec(prop::collection::vec(0usize..3, 0..4), 1..4)
}

proptest! {
    #![proptest_config(ProptestConfig { max_global_rejects: 16384, ..ProptestConfig::with_cases(256) })]

    /// Resolving the same address twice against an unchanged host gives the same answer.
    #[test]
    fn resolve_is_deterministic(
        layout in layout_strategy(),
        t in 0usize..5,
        d in 0usize..5,
        c in prop::option::of((0usize..4, 0usize..2)),
    ) {
        let host = build(&layout);
        let mut addr = Address::new(t, d);
        if let Some((chain, dev)) = c {
            addr = addr.with_chain(chain, dev);
        }
        prop_assert_eq!(resolve(&host, &addr), resolve(&host, &addr));
    }

    /// Top-level addresses succeed exactly when both indices are in range, and
    /// otherwise name the first selector that fell outside.
    #[test]
    fn top_level_outcome_matches_layout(
        layout in layout_strategy(),
        t in 0usize..5,
        d in 0usize..5,
    ) {
        let host = build(&layout);
        let result = resolve(&host, &Address::new(t, d));
        match layout.get(t) {
            None => {
                let is_track_not_found = matches!(
                    result,
                    Err(RackError::Address(AddressError::TrackNotFound { .. }))
                );
                prop_assert!(is_track_not_found);
            }
            Some(devices) if d >= devices.len() => {
                let is_device_not_found = matches!(
                    result,
                    Err(RackError::Address(AddressError::DeviceNotFound { .. }))
                );
                prop_assert!(is_device_not_found);
            }
            Some(_) => prop_assert!(result.is_ok()),
        }
    }

    /// Chain steps succeed only into racks with enough chains.
    #[test]
    fn chain_step_outcome_matches_layout(
        layout in layout_strategy(),
        t in 0usize..4,
        d in 0usize..4,
        c in 0usize..3,
    ) {
        prop_assume!(t < layout.len() && d < layout[t].len());
        let host = build(&layout);
        let result = resolve(&host, &Address::new(t, d).with_chain(c, 0));
        let chains = layout[t][d];
        if chains == 0 {
            let is_not_a_rack = matches!(
                result,
                Err(RackError::Address(AddressError::NotARack { .. }))
            );
            prop_assert!(is_not_a_rack);
        } else if c >= chains {
            let is_chain_not_found = matches!(
                result,
                Err(RackError::Address(AddressError::ChainNotFound { .. }))
            );
            prop_assert!(is_chain_not_found);
        } else {
            let node = result.unwrap();
            prop_assert_eq!(node.name(), "Leaf");
        }
    }

    /// Selector lists round-trip through `Address`.
    #[test]
    fn selectors_round_trip(sel in prop::collection::vec(0usize..100, 1..5)) {
        let mut list = sel.clone();
        list.extend(sel);
        let addr = Address::from_selectors(&list).unwrap();
        prop_assert_eq!(addr.selectors(), list);
    }

    /// Scaled values always land inside the target range.
    #[test]
    fn scale_stays_in_target(
        a in -1000.0f32..1000.0,
        b in -1000.0f32..1000.0,
        c in -1000.0f32..1000.0,
        d in -1000.0f32..1000.0,
        v in -2000.0f32..2000.0,
    ) {
        let target = ParamRange::new(c, d);
        let out = ValueScale::linear(ParamRange::new(a, b), target).apply(v);
        prop_assert!(target.contains(out), "{} not in [{}, {}]", out, target.min, target.max);
    }
}
