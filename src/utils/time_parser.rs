use chrono::{DateTime, Duration, Utc};

/// 解析过期时间，支持：
/// - RFC3339 格式：2026-10-01T12:00:00Z
/// - 相对时间：30m, 2h, 1d, 2w, 1y，可组合：1d12h
///
/// 相对时间以 `now` 为基准。
pub fn parse_expire_time(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, String> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    let duration = parse_relative_duration(input)?;
    now.checked_add_signed(duration)
        .ok_or_else(|| "Expiry time is out of range".to_string())
}

fn parse_relative_duration(input: &str) -> Result<Duration, String> {
    let mut total = Duration::zero();
    let mut rest = input;

    while !rest.is_empty() {
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return Err(format!("Invalid time format: '{}'", input));
        }
        let num: i64 = rest[..digits]
            .parse()
            .map_err(|_| format!("Invalid number in '{}'", input))?;
        rest = &rest[digits..];

        let unit_len = rest.bytes().take_while(u8::is_ascii_alphabetic).count();
        if unit_len == 0 {
            return Err(format!("Missing time unit after '{}'", num));
        }
        let unit = &rest[..unit_len];
        rest = &rest[unit_len..];

        let part = match unit.to_ascii_lowercase().as_str() {
            "s" | "sec" | "second" | "seconds" => Duration::try_seconds(num),
            "m" | "min" | "minute" | "minutes" => Duration::try_minutes(num),
            "h" | "hour" | "hours" => Duration::try_hours(num),
            "d" | "day" | "days" => Duration::try_days(num),
            "w" | "week" | "weeks" => Duration::try_weeks(num),
            "y" | "year" | "years" => num.checked_mul(365).and_then(Duration::try_days),
            _ => return Err(format!("Unsupported time unit: '{}'", unit)),
        }
        .ok_or_else(|| format!("Time value too large: '{}'", input))?;

        total = total
            .checked_add(&part)
            .ok_or_else(|| format!("Time value too large: '{}'", input))?;
    }

    if total.is_zero() {
        return Err("Time interval cannot be zero".to_string());
    }
    Ok(total)
}
