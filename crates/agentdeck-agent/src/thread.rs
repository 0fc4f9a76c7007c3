use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

static LAST_ISSUED: AtomicI64 = AtomicI64::new(0);

/// Generate a thread id from the current time in milliseconds.
///
/// Ids issued by one process are strictly increasing, so two requests in the
/// same millisecond still get different threads.
pub fn new_thread_id() -> String {
    let now = Utc::now().timestamp_millis();
    let issued = LAST_ISSUED
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |prev| Some(now.max(prev + 1)))
        .map_or(now, |prev| now.max(prev + 1));
    issued.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_numeric_and_increasing() {
        let ids: Vec<i64> = (0..1000).map(|_| new_thread_id().parse().unwrap()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn ids_track_wall_clock() {
        let before = Utc::now().timestamp_millis();
        let id: i64 = new_thread_id().parse().unwrap();
        assert!(id >= before);
    }
}
