//! Text formatting for byte counts, durations and throughput figures.

const NANOS_PER_MICRO: u64 = 1_000;
const NANOS_PER_MILLI: u64 = 1_000_000;
const NANOS_PER_SECOND: u64 = 1_000_000_000;
const NANOS_PER_MINUTE: u64 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: u64 = 60 * NANOS_PER_MINUTE;
const NANOS_PER_DAY: u64 = 24 * NANOS_PER_HOUR;

const BYTE_UNITS: [(&str, f64); 5] = [
    ("PB", 1024.0 * 1024.0 * 1024.0 * 1024.0 * 1024.0),
    ("TB", 1024.0 * 1024.0 * 1024.0 * 1024.0),
    ("GB", 1024.0 * 1024.0 * 1024.0),
    ("MB", 1024.0 * 1024.0),
    ("kB", 1024.0),
];

/// Rounds half up at `digits` decimal places by scaling, rounding and scaling back.
///
/// The scaled value keeps its binary error: `1.005 * 100` is `100.49999999999999`,
/// so `1.005` rounds to `1`, while `2.005 * 100` is exactly `200.5` and gives `2.01`.
pub fn round_to_digits(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor + 0.5).floor() / factor
}

/// Formats a byte count (or byte rate) with the largest unit it strictly exceeds.
///
/// `1024` stays `"1024B"`; `1025` becomes `"1kB"`.
pub fn format_bytes(bytes: f64) -> String {
    if !bytes.is_finite() {
        return "0B".to_string();
    }
    for (unit, threshold) in BYTE_UNITS {
        if bytes > threshold {
            return format!("{}{}", round_to_digits(bytes / threshold, 2), unit);
        }
    }
    format!("{}B", round_to_digits(bytes, 2))
}

/// Breaks a nanosecond duration into `d h m s` and, with `details`, a trailing `ms.us` part.
pub fn format_duration(duration_ns: u64, details: bool) -> String {
    let days = duration_ns / NANOS_PER_DAY;
    let hours = (duration_ns / NANOS_PER_HOUR) % 24;
    let minutes = (duration_ns / NANOS_PER_MINUTE) % 60;
    let seconds = (duration_ns / NANOS_PER_SECOND) % 60;

    let mut out = format!("{days}d {hours}h {minutes}m {seconds}s ");
    if details {
        let millis = (duration_ns / NANOS_PER_MILLI) % 1000;
        let micros = (duration_ns / NANOS_PER_MICRO) % 1000;
        out.push_str(&format!("{millis}.{micros}ms"));
    }
    out
}

/// `amount / duration_secs`, or `0.0` when there is no elapsed time to divide by.
pub fn per_second(amount: u64, duration_secs: f64) -> f64 {
    if duration_secs > 0.0 {
        amount as f64 / duration_secs
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0.0), "0B");
        assert_eq!(format_bytes(1023.0), "1023B");
        assert_eq!(format_bytes(1024.0), "1024B");
        assert_eq!(format_bytes(1025.0), "1kB");
        assert_eq!(format_bytes(1536.0), "1.5kB");
        assert_eq!(format_bytes(1024.0 * 1024.0), "1024kB");
        assert_eq!(format_bytes(1024.0 * 1024.0 + 1.0), "1MB");
        assert_eq!(format_bytes(29_312_178.0), "27.95MB");
        assert_eq!(format_bytes(3.0 * 1024.0 * 1024.0 * 1024.0 * 1024.0 * 1024.0), "3PB");
    }

    #[test]
    fn test_format_bytes_fractional_rates() {
        assert_eq!(format_bytes(512.5), "512.5B");
        assert_eq!(format_bytes(100.0 / 3.0), "33.33B");
        assert_eq!(format_bytes(f64::NAN), "0B");
    }

    #[test]
    fn test_format_duration_compact() {
        assert_eq!(format_duration(90_061_001_002_000, false), "1d 1h 1m 1s ");
        assert_eq!(format_duration(0, false), "0d 0h 0m 0s ");
        assert_eq!(format_duration(59 * NANOS_PER_SECOND, false), "0d 0h 0m 59s ");
    }

    #[test]
    fn test_format_duration_details() {
        assert_eq!(format_duration(90_061_001_002_000, true), "1d 1h 1m 1s 1.2ms");
        assert_eq!(format_duration(1_234_567_890, true), "0d 0h 0m 1s 234.567ms");
    }

    #[test]
    fn test_round_to_digits() {
        assert_eq!(round_to_digits(1.234, 2), 1.23);
        assert_eq!(round_to_digits(0.125, 2), 0.13);
        assert_eq!(round_to_digits(2.5, 0), 3.0);
        assert_eq!(round_to_digits(7.0, 2), 7.0);
        assert_eq!(round_to_digits(2.005, 2), 2.01);
        // 1.005 * 100 lands just below the half.
        assert_eq!(round_to_digits(1.005, 2), 1.0);
    }

    #[test]
    fn test_per_second_guards_zero_duration() {
        assert_eq!(per_second(100, 0.0), 0.0);
        assert_eq!(per_second(100, 4.0), 25.0);
    }
}
