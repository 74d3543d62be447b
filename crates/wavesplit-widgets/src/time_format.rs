//! Time labels for the ruler, markers and transport display

/// Ruler tick steps in seconds, smallest first
const TICK_STEPS: &[f64] = &[
    0.01, 0.02, 0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 5.0, 10.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0,
    900.0, 1800.0, 3600.0,
];

/// `mm:ss.cc`, with minutes growing past two digits for long files
pub fn format_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let total_centis = (seconds * 100.0).round() as u64;
    let minutes = total_centis / 6000;
    let secs = (total_centis / 100) % 60;
    let centis = total_centis % 100;
    format!("{:02}:{:02}.{:02}", minutes, secs, centis)
}

/// Smallest step that keeps ticks at least `min_spacing_px` apart
pub fn tick_interval(visible_seconds: f64, width_px: f64, min_spacing_px: f64) -> f64 {
    if visible_seconds <= 0.0 || width_px <= 0.0 {
        return TICK_STEPS[TICK_STEPS.len() - 1];
    }
    let px_per_second = width_px / visible_seconds;
    TICK_STEPS
        .iter()
        .copied()
        .find(|step| step * px_per_second >= min_spacing_px)
        .unwrap_or(TICK_STEPS[TICK_STEPS.len() - 1])
}

/// Tick times in `[start, end]` on multiples of `step`
pub fn tick_times(start: f64, end: f64, step: f64) -> Vec<f64> {
    if step <= 0.0 || end < start {
        return Vec::new();
    }
    let first = (start / step).ceil() as i64;
    let last = (end / step).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "00:00.00");
        assert_eq!(format_time(10.5), "00:10.50");
        assert_eq!(format_time(75.333), "01:15.33");
        assert_eq!(format_time(59.999), "01:00.00");
        assert_eq!(format_time(6000.0), "100:00.00");
        assert_eq!(format_time(-3.0), "00:00.00");
        assert_eq!(format_time(f64::NAN), "00:00.00");
    }

    #[test]
    fn test_tick_interval_keeps_spacing() {
        // 45s over 1000px: 22px/s, so 5s steps give 111px
        assert_eq!(tick_interval(45.0, 1000.0, 80.0), 5.0);
        // Zoomed to 1s over 1000px
        assert_eq!(tick_interval(1.0, 1000.0, 80.0), 0.1);
        // Degenerate input falls back to the widest step
        assert_eq!(tick_interval(0.0, 1000.0, 80.0), 3600.0);
    }

    #[test]
    fn test_tick_times_on_multiples() {
        let ticks = tick_times(3.2, 17.0, 5.0);
        assert_eq!(ticks, vec![5.0, 10.0, 15.0]);
        assert!(tick_times(5.0, 1.0, 1.0).is_empty());
    }
}
