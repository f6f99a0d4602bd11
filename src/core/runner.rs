use crate::core::codec::Codec;
use crate::core::timer::{DutyCycleTimer, SystemClock};
use crate::domain::model::{PassReport, PayloadBuffer};
use crate::domain::ports::Clock;
use crate::utils::error::{FakeProcessError, Result};
use std::convert::Infallible;
use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// 忙碌與閒置的比例設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DutyCycle {
    /// 多久檢查一次是否該睡
    pub freq: Duration,
    /// 每次睡多久
    pub duration: Duration,
}

impl DutyCycle {
    pub fn from_millis(freq_ms: u64, duration_ms: u64) -> Self {
        Self {
            freq: Duration::from_millis(freq_ms),
            duration: Duration::from_millis(duration_ms),
        }
    }
}

/// 反覆解壓縮同一份資料來消耗 CPU，定期睡一下
///
/// 每一輪都先把 payload 倒帶，再建立新的解壓縮串流。讀到串流結尾就開始
/// 下一輪；其他解壓縮錯誤都是致命的。
pub struct DutyCycleRunner<C: Clock = SystemClock> {
    payload: PayloadBuffer,
    codec: Codec,
    cycle: DutyCycle,
    timer: DutyCycleTimer,
    clock: C,
    scratch: Vec<u8>,
    passes: u64,
}

impl DutyCycleRunner<SystemClock> {
    pub fn new(payload: PayloadBuffer, codec: Codec, cycle: DutyCycle, chunk_size: usize) -> Result<Self> {
        Self::with_clock(payload, codec, cycle, chunk_size, SystemClock)
    }
}

impl<C: Clock> DutyCycleRunner<C> {
    pub fn with_clock(
        payload: PayloadBuffer,
        codec: Codec,
        cycle: DutyCycle,
        chunk_size: usize,
        clock: C,
    ) -> Result<Self> {
        if chunk_size == 0 {
            return Err(FakeProcessError::InvalidConfigValueError {
                field: "chunk_size".to_string(),
                value: chunk_size.to_string(),
                reason: "Value must be at least 1".to_string(),
            });
        }

        let codec = codec.resolve(payload.as_bytes())?;
        tracing::debug!(
            "Resolved payload codec to {} ({} compressed bytes)",
            codec.name(),
            payload.len()
        );

        let timer = DutyCycleTimer::new(cycle.freq, clock.now());

        Ok(Self {
            payload,
            codec,
            cycle,
            timer,
            clock,
            scratch: vec![0u8; chunk_size],
            passes: 0,
        })
    }

    pub fn codec(&self) -> Codec {
        self.codec
    }

    pub fn passes_completed(&self) -> u64 {
        self.passes
    }

    /// 無限迴圈，只會在致命錯誤時回傳
    pub fn run<F>(&mut self, mut on_pass: F) -> Result<Infallible>
    where
        F: FnMut(&PassReport),
    {
        loop {
            let report = self.run_pass()?;
            on_pass(&report);
        }
    }

    /// 跑一輪，把解壓縮結果丟掉
    pub fn run_pass(&mut self) -> Result<PassReport> {
        self.run_pass_into(&mut std::io::sink())
    }

    /// 跑一輪，解壓縮出來的資料寫進 `sink`
    pub fn run_pass_into<W: Write>(&mut self, sink: &mut W) -> Result<PassReport> {
        let pass = self.passes + 1;
        let started = self.clock.now();
        let mut report = PassReport {
            pass,
            ..Default::default()
        };

        let reader = self.payload.rewind()?;
        let mut stream = self.codec.open(reader);

        loop {
            // 有待處理的觸發就先睡，正在進行的讀取不會被打斷
            if self.timer.poll(self.clock.now()) {
                self.clock.sleep(self.cycle.duration);
                report.sleeps += 1;
                report.slept += self.cycle.duration;
                continue;
            }

            match stream.read(&mut self.scratch) {
                Ok(0) => break,
                Ok(n) => {
                    sink.write_all(&self.scratch[..n])?;
                    report.bytes_decompressed += n as u64;
                    report.chunks += 1;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(source) => return Err(FakeProcessError::DecodeError { pass, source }),
            }
        }

        report.elapsed = self.clock.now().saturating_duration_since(started);
        self.passes = pass;
        Ok(report)
    }
}
