//! Property-based tests for parameter ranges and the shared store.

use proptest::prelude::*;
use sonido_params::{ParamHost, ParamIndex, ParamRange, ParamScale, ParamSpec, SharedParams};

fn scale_strategy() -> impl Strategy<Value = ParamScale> {
    prop_oneof![
        Just(ParamScale::Linear),
        Just(ParamScale::Logarithmic),
        (0.25f32..4.0f32).prop_map(ParamScale::Power),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Normalized positions always land in `0..=1`, whatever the input.
    #[test]
    fn normalize_stays_in_unit_range(
        min in 0.01f32..100.0f32,
        span in 0.1f32..10000.0f32,
        value in -1e6f32..1e6f32,
        scale in scale_strategy(),
    ) {
        let range = ParamRange::linear(min, min + span, min).with_scale(scale);
        let n = range.normalize(value);
        prop_assert!((0.0..=1.0).contains(&n), "normalize({value}) = {n}");
    }

    /// denormalize(normalize(x)) recovers any in-range plain value.
    #[test]
    fn normalize_inverts(
        min in 0.01f32..100.0f32,
        span in 0.1f32..1000.0f32,
        t in 0.0f32..=1.0f32,
        scale in scale_strategy(),
    ) {
        let range = ParamRange::linear(min, min + span, min).with_scale(scale);
        let plain = min + t * span;
        let back = range.denormalize(range.normalize(plain));
        prop_assert!(
            (back - plain).abs() <= span * 1e-3,
            "{scale:?}: {plain} -> {back}"
        );
    }

    /// Editor writes clamp into `0..=1` and are never reported back as
    /// host-originated changes.
    #[test]
    fn editor_writes_clamp_without_echo(
        writes in prop::collection::vec((0usize..4, -10.0f32..10.0f32), 1..32),
    ) {
        let params = SharedParams::new(
            (0..4)
                .map(|i| ParamSpec::new(format!("P{i}"), ParamRange::unit(0.5)))
                .collect(),
            None,
        );

        for &(index, value) in &writes {
            let stored = params.set_normalized_value(ParamIndex(index), value).unwrap();
            prop_assert_eq!(stored, value.clamp(0.0, 1.0));
        }

        let mut echoed = 0;
        params.drain_changes(&mut |_, _| echoed += 1);
        prop_assert_eq!(echoed, 0);
    }

    /// Every host write is drained exactly once, with the latest value.
    #[test]
    fn host_writes_drain_once(
        writes in prop::collection::vec((0usize..4, 0.0f32..=1.0f32), 1..32),
    ) {
        let params = SharedParams::new(
            (0..4)
                .map(|i| ParamSpec::new(format!("P{i}"), ParamRange::unit(0.0)))
                .collect(),
            None,
        );

        let mut latest = [None; 4];
        for &(index, value) in &writes {
            params.set_from_host(index, value);
            latest[index] = Some(value);
        }

        let mut drained = [None; 4];
        params.drain_changes(&mut |index, value| drained[index.0] = Some(value));
        prop_assert_eq!(drained, latest);

        let mut again = 0;
        params.drain_changes(&mut |_, _| again += 1);
        prop_assert_eq!(again, 0);
    }
}
