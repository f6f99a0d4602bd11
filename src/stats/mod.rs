//! 觀察 fake-process 的排程器計數器 (Linux `/proc`)

pub mod collector;
pub mod sched;
