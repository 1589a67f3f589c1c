const NANOS_PER_MILLI: i64 = 1_000_000;
const MILLIS_PER_SECOND: i64 = 1_000;
const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;

/// Render a run duration given in nanoseconds as `"1h 2m 3s 4ms"`.
///
/// Leading zero units are omitted, inner ones are kept (`"1h 0m 5s 0ms"`).
/// Hours are not folded into days. Milliseconds are rounded to the nearest
/// whole value and carry into the larger units, so `999.6ms` prints as
/// `"1s 0ms"`.
///
/// The result is `"0ms"` exactly when `nanos` is zero; negative input is
/// clamped to zero and a positive duration under half a millisecond is
/// `"<1ms"`.
pub fn pretty_duration(nanos: i64) -> String {
    let nanos = nanos.max(0);
    if nanos == 0 {
        return "0ms".to_string();
    }

    let total_ms = nanos / NANOS_PER_MILLI + i64::from(nanos % NANOS_PER_MILLI >= NANOS_PER_MILLI / 2);
    if total_ms == 0 {
        return "<1ms".to_string();
    }

    let hours = total_ms / MILLIS_PER_HOUR;
    let minutes = total_ms % MILLIS_PER_HOUR / MILLIS_PER_MINUTE;
    let seconds = total_ms % MILLIS_PER_MINUTE / MILLIS_PER_SECOND;
    let millis = total_ms % MILLIS_PER_SECOND;

    if hours != 0 {
        format!("{hours}h {minutes}m {seconds}s {millis}ms")
    } else if minutes != 0 {
        format!("{minutes}m {seconds}s {millis}ms")
    } else if seconds != 0 {
        format!("{seconds}s {millis}ms")
    } else {
        format!("{millis}ms")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: i64 = NANOS_PER_MILLI;

    #[test]
    fn zero_is_zero_ms() {
        assert_eq!(pretty_duration(0), "0ms");
    }

    #[test]
    fn negative_is_clamped() {
        assert_eq!(pretty_duration(-5 * MS), "0ms");
    }

    #[test]
    fn sub_millisecond_is_not_zero() {
        assert_eq!(pretty_duration(1), "<1ms");
        assert_eq!(pretty_duration(MS / 2 - 1), "<1ms");
        assert_eq!(pretty_duration(MS / 2), "1ms");
    }

    #[test]
    fn omits_leading_zero_units() {
        assert_eq!(pretty_duration(4 * MS), "4ms");
        assert_eq!(pretty_duration(3_004 * MS), "3s 4ms");
        assert_eq!(pretty_duration((2 * 60_000 + 3_004) * MS), "2m 3s 4ms");
        assert_eq!(
            pretty_duration((3_600_000 + 2 * 60_000 + 3_004) * MS),
            "1h 2m 3s 4ms"
        );
    }

    #[test]
    fn keeps_inner_zero_units() {
        assert_eq!(pretty_duration((3_600_000 + 5_000) * MS), "1h 0m 5s 0ms");
        assert_eq!(pretty_duration(60_000 * MS), "1m 0s 0ms");
    }

    #[test]
    fn rounding_carries_into_seconds() {
        assert_eq!(pretty_duration(999 * MS + 600_000), "1s 0ms");
        assert_eq!(pretty_duration(59_999 * MS + 500_000), "1m 0s 0ms");
    }

    #[test]
    fn hours_do_not_roll_into_days() {
        assert_eq!(pretty_duration(30 * 3_600_000 * MS), "30h 0m 0s 0ms");
    }

    #[test]
    fn only_zero_renders_zero_ms() {
        for nanos in [1, 10, 1_000, 499_999, 500_000, 1_000_000, 7_654_321_000] {
            assert_ne!(pretty_duration(nanos), "0ms", "nanos = {nanos}");
        }
    }
}
