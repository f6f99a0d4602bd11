use crate::domain::ports::Clock;
use std::time::{Duration, Instant};

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// 系統時鐘
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// 定期觸發的睡眠訊號
///
/// 只是記錄下一次的期限，`poll` 是非阻塞的比較。錯過的觸發會合併成一次，
/// 下一個期限永遠對齊在 `start + k * interval` 上且晚於目前時間。
#[derive(Debug, Clone)]
pub struct DutyCycleTimer {
    interval: Duration,
    next_deadline: Instant,
}

impl DutyCycleTimer {
    pub fn new(interval: Duration, start: Instant) -> Self {
        let interval = interval.max(MIN_INTERVAL);
        Self {
            interval,
            next_deadline: start + interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn next_deadline(&self) -> Instant {
        self.next_deadline
    }

    /// 自上次檢查後是否已經觸發
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_deadline {
            return false;
        }

        let behind = (now - self.next_deadline).as_nanos();
        let interval = self.interval.as_nanos();
        let remaining = interval - behind % interval;
        self.next_deadline = now + Duration::from_nanos(remaining as u64);
        true
    }
}
