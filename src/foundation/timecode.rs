/// Format a project time as an `HH:MM:SS:FF` timecode string.
///
/// The frame field counts at the nominal (rounded) frame rate; fractional
/// rates such as 29.97 display with a 30-frame field and no drop-frame
/// compensation. Negative times and non-positive rates clamp to zero.
pub fn format_timecode(seconds: f64, fps: f64) -> String {
    let nominal = if fps > 0.0 { fps.round().max(1.0) as u64 } else { 1 };
    let fps = if fps > 0.0 { fps } else { 1.0 };
    let total_frames = (seconds.max(0.0) * fps).floor() as u64;

    let frames = total_frames % nominal;
    let total_seconds = total_frames / nominal;
    let secs = total_seconds % 60;
    let mins = (total_seconds / 60) % 60;
    let hours = total_seconds / 3600;

    format!("{hours:02}:{mins:02}:{secs:02}:{frames:02}")
}
