use std::sync::atomic::{AtomicI64, Ordering};

/// Unix timestamp in milliseconds
pub type Timestamp = i64;

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> Timestamp {
    chrono::Utc::now().timestamp_millis()
}

/// Custom epoch: 2024-01-01 00:00:00 UTC
const EPOCH_MS: i64 = 1_704_067_200_000;

/// Last id handed out by [`snowflake_id`] in this process.
static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: per-millisecond sequence
///
/// Ids are strictly increasing within a process, so sorting by id follows
/// creation order even for records created in the same millisecond.
pub fn snowflake_id() -> i64 {
    let ts = (now_millis() - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let candidate = ts << 12;
    let mut last = LAST_ID.load(Ordering::Relaxed);
    loop {
        let next = if candidate > last { candidate } else { last + 1 };
        match LAST_ID.compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(actual) => last = actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snowflake_ids_strictly_increase() {
        let ids: Vec<i64> = (0..10_000).map(|_| snowflake_id()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_snowflake_id_fits_js_safe_integer() {
        let id = snowflake_id();
        assert!(id > 0);
        assert!(id < (1i64 << 53));
    }
}
