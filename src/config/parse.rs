use std::time::Duration;

use crate::error::ConfigError;

/// Parses a duration like `500ms`, `10s`, `1m`, or `2h`. A bare number is
/// seconds. Zero is allowed here; fields that require a positive duration
/// validate that separately, since zero-length stages are legal.
///
/// # Errors
///
/// Returns a `ConfigError` for empty input, a malformed number, an unknown
/// unit, or overflow.
pub fn parse_duration_value(value: &str) -> Result<Duration, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::DurationEmpty);
    }

    let digits_len = value.chars().take_while(char::is_ascii_digit).count();
    if digits_len == 0 {
        return Err(ConfigError::InvalidDurationFormat {
            value: value.to_owned(),
        });
    }
    let (num_part, unit_part) = value.split_at(digits_len);
    let number: u64 = num_part
        .parse()
        .map_err(|source| ConfigError::InvalidDurationNumber {
            value: value.to_owned(),
            source,
        })?;

    let unit = if unit_part.is_empty() { "s" } else { unit_part };
    match unit {
        "ms" => Ok(Duration::from_millis(number)),
        "s" => Ok(Duration::from_secs(number)),
        "m" => number
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or(ConfigError::DurationOverflow),
        "h" => number
            .checked_mul(60)
            .and_then(|secs| secs.checked_mul(60))
            .map(Duration::from_secs)
            .ok_or(ConfigError::DurationOverflow),
        _ => Err(ConfigError::InvalidDurationUnit {
            unit: unit.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_unit() -> Result<(), String> {
        let cases = [
            ("500ms", Duration::from_millis(500)),
            ("10s", Duration::from_secs(10)),
            ("10", Duration::from_secs(10)),
            ("1m", Duration::from_secs(60)),
            ("2h", Duration::from_secs(7200)),
            (" 30s ", Duration::from_secs(30)),
            ("0s", Duration::ZERO),
        ];
        for (input, expected) in cases {
            let parsed = parse_duration_value(input).map_err(|err| err.to_string())?;
            if parsed != expected {
                return Err(format!("'{}' parsed as {:?}", input, parsed));
            }
        }
        Ok(())
    }

    #[test]
    fn rejects_malformed_durations() {
        for input in ["", "fast", "10x", "ms", "-5s", "10.5s"] {
            assert!(parse_duration_value(input).is_err(), "'{}' should not parse", input);
        }
    }
}
