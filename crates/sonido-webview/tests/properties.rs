//! Property-based tests for the editor's parameter and geometry contracts.

mod common;

use common::{Recorder, asset_dir, open, params};
use proptest::prelude::*;
use serde_json::json;
use sonido_params::{ParamHost, ParamIndex};
use sonido_webview::{Bounds, Container, EditorConfig, apply_set_parameter};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any in-range value sent through the event channel is what the
    /// parameter host reports afterwards.
    #[test]
    fn set_parameter_round_trip(id in 0usize..3, v in 0.0f64..=1.0f64) {
        let dir = asset_dir();
        let recorder = Recorder::install();
        let params = params();
        let mut editor = open(params.clone(), &EditorConfig::new(dir.path(), 480, 380), &recorder).unwrap();

        recorder.send(json!({"type": "setParameterValue", "id": id, "value": v}));
        editor.on_idle();

        let stored = params.normalized_value(ParamIndex(id)).unwrap();
        prop_assert!((f64::from(stored) - v).abs() < 1e-6, "sent {v}, stored {stored}");
    }

    /// Any finite value is stored inside `0..=1` and never faults.
    #[test]
    fn values_are_clamped(id in 0usize..3, v in -1e6f64..1e6f64) {
        let params = params();
        let confirmation = apply_set_parameter(&params, id, v);
        prop_assert!(confirmation.is_some());

        let stored = params.normalized_value(ParamIndex(id)).unwrap();
        prop_assert!((0.0..=1.0).contains(&stored));
        let expected = v.clamp(0.0, 1.0);
        prop_assert!((f64::from(stored) - expected).abs() < 1e-6);
    }

    /// Writes to an index past the end leave every parameter untouched.
    #[test]
    fn unknown_index_writes_nothing(offset in 0usize..1000, v in -2.0f64..2.0f64) {
        let params = params();
        let before: Vec<f32> = (0..3)
            .map(|i| params.normalized_value(ParamIndex(i)).unwrap())
            .collect();

        prop_assert!(apply_set_parameter(&params, params.param_count() + offset, v).is_none());

        let after: Vec<f32> = (0..3)
            .map(|i| params.normalized_value(ParamIndex(i)).unwrap())
            .collect();
        prop_assert_eq!(before, after);
    }

    /// After any resize sequence the container covers exactly the last size.
    #[test]
    fn container_tracks_last_resize(sizes in prop::collection::vec((1u32..4096, 1u32..4096), 1..16)) {
        let dir = asset_dir();
        let recorder = Recorder::install();
        let mut editor = open(params(), &EditorConfig::new(dir.path(), 480, 380), &recorder).unwrap();

        for &(w, h) in &sizes {
            editor.set_size(w, h);
        }
        let (w, h) = *sizes.last().unwrap();
        prop_assert_eq!(editor.container().bounds(), Bounds::new(0, 0, w, h));
        prop_assert_eq!(editor.bounds(), Bounds::new(0, 0, w, h));
    }
}
