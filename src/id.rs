//! Task identifier generation.

use chrono::Utc;
use rand::Rng;

const SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Source of new task ids. The store only needs ids that are unique within
/// its own collection.
pub trait IdGenerator {
    fn new_id(&mut self) -> String;
}

/// `task_<millis>_<random base36>` ids.
///
/// The millisecond component is the latest timestamp this generator has
/// observed, so it never runs backwards even if the wall clock does.
/// Uniqueness rests on the random suffix; collisions are improbable, not
/// impossible.
#[derive(Debug, Default)]
pub struct TimestampIds {
    last_millis: i64,
}

impl TimestampIds {
    pub fn new() -> Self {
        Self::default()
    }

    fn observe(&mut self, now_millis: i64) -> i64 {
        self.last_millis = self.last_millis.max(now_millis);
        self.last_millis
    }
}

impl IdGenerator for TimestampIds {
    fn new_id(&mut self) -> String {
        let millis = self.observe(Utc::now().timestamp_millis());
        let mut rng = rand::thread_rng();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();
        format!("task_{millis}_{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_id_shape() {
        let id = TimestampIds::new().new_id();
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "task");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), SUFFIX_LEN);
        assert!(parts[2].bytes().all(|b| BASE36.contains(&b)));
    }

    #[test]
    fn test_observed_clock_is_monotonic() {
        let mut ids = TimestampIds::new();
        assert_eq!(ids.observe(1_000), 1_000);
        assert_eq!(ids.observe(900), 1_000);
        assert_eq!(ids.observe(1_200), 1_200);
    }

    #[test]
    fn test_ids_do_not_repeat() {
        let mut ids = TimestampIds::new();
        let seen: HashSet<String> = (0..500).map(|_| ids.new_id()).collect();
        assert_eq!(seen.len(), 500);
    }
}
