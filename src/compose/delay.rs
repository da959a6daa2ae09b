/// Delay used when the source delay is missing, zero, negative or non-finite.
pub const DEFAULT_DELAY_MS: u32 = 100;
/// Lower clamp for normalized delays.
pub const MIN_DELAY_MS: u32 = 20;
/// Upper clamp for normalized delays.
pub const MAX_DELAY_MS: u32 = 1000;

/// Convert a raw GIF delay (hundredths of a second) to clamped milliseconds.
///
/// Malformed delays are recovered rather than rejected so playback never appears frozen.
pub fn normalize_delay_ms(delay_centis: f64) -> u32 {
    let mut ms = if delay_centis.is_finite() {
        delay_centis * 10.0
    } else {
        f64::from(DEFAULT_DELAY_MS)
    };
    if ms <= 0.0 {
        ms = f64::from(DEFAULT_DELAY_MS);
    }
    ms.clamp(f64::from(MIN_DELAY_MS), f64::from(MAX_DELAY_MS))
        .round() as u32
}

/// Normalize an integer raw delay, as carried by a logical frame.
pub fn normalize_raw_delay(delay_raw: i32) -> u32 {
    normalize_delay_ms(f64::from(delay_raw))
}

#[cfg(test)]
#[path = "../../tests/unit/compose/delay.rs"]
mod tests;
