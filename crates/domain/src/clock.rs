//! # Clock
//!
//! 時刻ベースのクイズ ID 採番が参照する「現在の Unix ミリ秒」の供給源。

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Unix エポックからの経過ミリ秒を返す
pub trait Clock: Send + Sync {
    fn epoch_millis(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn epoch_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// 手動で進める時計（テスト用）
///
/// [`advance`](FixedClock::advance) を呼ぶまで同じ値を返し続ける。
#[derive(Debug)]
pub struct FixedClock(AtomicI64);

impl FixedClock {
    pub fn at_millis(millis: i64) -> Self {
        Self(AtomicI64::new(millis))
    }

    pub fn advance(&self, millis: i64) {
        self.0.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn epoch_millis(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_システム時計はchronoの現在時刻と一致する範囲を返す() {
        let before = Utc::now().timestamp_millis();
        let millis = SystemClock.epoch_millis();

        assert!(millis >= before);
        assert!(millis <= Utc::now().timestamp_millis());
    }

    #[test]
    fn test_固定時計はadvanceした分だけ進む() {
        let clock = FixedClock::at_millis(1_000);

        clock.advance(25);

        assert_eq!(clock.epoch_millis(), 1_025);
        assert_eq!(clock.epoch_millis(), 1_025);
    }
}
