use std::io::{Cursor, Seek};
use std::time::Duration;

/// 下載後的壓縮資料，只讀、可倒帶
///
/// 內容在建立後不會再改變，執行器每一輪只會移動讀取游標。
#[derive(Debug, Clone)]
pub struct PayloadBuffer {
    cursor: Cursor<Vec<u8>>,
}

impl PayloadBuffer {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            cursor: Cursor::new(bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.cursor.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursor.get_ref().is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.cursor.get_ref()
    }

    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// 把游標移回開頭，並交出讀取端給新的解壓縮串流
    pub fn rewind(&mut self) -> std::io::Result<&mut Cursor<Vec<u8>>> {
        self.cursor.rewind()?;
        Ok(&mut self.cursor)
    }
}

/// 單一輪解壓縮的統計
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    pub pass: u64,
    pub bytes_decompressed: u64,
    pub chunks: u64,
    pub sleeps: u64,
    pub slept: Duration,
    pub elapsed: Duration,
}

impl PassReport {
    /// 這一輪中睡眠時間所佔的比例
    pub fn sleep_fraction(&self) -> f64 {
        if self.elapsed.is_zero() {
            return 0.0;
        }
        self.slept.as_secs_f64() / self.elapsed.as_secs_f64()
    }
}
