//! Plugin-host behavior that must hold without any real plugin binary:
//! failed loads report cleanly, unknown effects are no-ops, shutdown is
//! idempotent.

use cutline::{load_ofx_plugin, shutdown_ofx_host};

#[test]
fn loading_a_missing_plugin_reports_false() {
    assert!(!load_ofx_plugin("/no/such/plugin.ofx.so"));
}

#[test]
fn shutdown_is_idempotent_and_safe_to_repeat() {
    shutdown_ofx_host();
    shutdown_ofx_host();
    // The host stays usable after shutdown.
    assert!(!load_ofx_plugin("/still/not/there.so"));
}

#[test]
fn rendering_with_an_unloaded_effect_leaves_pixels_untouched() {
    let mut buf = vec![42u8; 16 * 16 * 4];
    let before = buf.clone();
    cutline::ofx::host::render_in_place("/never/loaded.so", &mut buf, 16, 16);
    assert_eq!(buf, before);
}
