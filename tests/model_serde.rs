//! The pure value types of the timeline model serialize, so hosts can
//! persist clip parameters without reaching into the engine.

use cutline::{Effect, FadeType, TrackKind, Transform};

#[test]
fn transform_roundtrips_through_json() {
    let transform = Transform {
        x: 12.5,
        y: -40.0,
        scale_x: 0.5,
        scale_y: 2.0,
        rotation: 90.0,
        anchor_x: 0.5,
        anchor_y: 0.5,
    };
    let json = serde_json::to_string(&transform).unwrap();
    let back: Transform = serde_json::from_str(&json).unwrap();
    assert_eq!(back, transform);
}

#[test]
fn default_transform_is_centered_and_unscaled() {
    let t = Transform::default();
    assert_eq!((t.x, t.y), (0.0, 0.0));
    assert_eq!((t.scale_x, t.scale_y), (1.0, 1.0));
    assert_eq!(t.rotation, 0.0);
    assert_eq!((t.anchor_x, t.anchor_y), (0.5, 0.5));
    assert!(t.is_identity());
}

#[test]
fn fade_and_effect_roundtrip_through_json() {
    let effect = Effect {
        name: "invert".to_owned(),
        plugin_path: "/plugins/invert.ofx.so".to_owned(),
        enabled: true,
    };
    let json = serde_json::to_string(&(FadeType::Smooth, &effect)).unwrap();
    let (fade, back): (FadeType, Effect) = serde_json::from_str(&json).unwrap();
    assert_eq!(fade, FadeType::Smooth);
    assert_eq!(back, effect);
}

#[test]
fn track_kind_serializes_by_name() {
    let json = serde_json::to_string(&TrackKind::Video).unwrap();
    assert_eq!(json, "\"Video\"");
    let back: TrackKind = serde_json::from_str("\"Audio\"").unwrap();
    assert_eq!(back, TrackKind::Audio);
}
