use std::time::{Duration, Instant};

/// 單調時鐘與阻塞式睡眠
///
/// 執行器只透過這個介面讀取時間與睡眠，測試可以換成假的時鐘。
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}
