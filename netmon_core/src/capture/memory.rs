use super::FrameSource;
use crate::error::{MonitorError, Result};
use bytes::Bytes;
use std::collections::VecDeque;

/// 内存中的帧队列，用于回放和测试
#[derive(Debug, Default)]
pub struct MemorySource {
    frames: VecDeque<Bytes>,
    fail_when_drained: bool,
    polls: usize,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_frames<I, B>(frames: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        Self {
            frames: frames.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// 队列取空后返回 SourceUnavailable，而不是 None
    pub fn fail_when_drained(mut self) -> Self {
        self.fail_when_drained = true;
        self
    }

    pub fn push(&mut self, frame: impl Into<Bytes>) {
        self.frames.push_back(frame.into());
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    /// poll_frame 被调用的次数
    pub fn polls(&self) -> usize {
        self.polls
    }
}

impl FrameSource for MemorySource {
    fn poll_frame(&mut self) -> Result<Option<Bytes>> {
        self.polls += 1;
        match self.frames.pop_front() {
            Some(frame) => Ok(Some(frame)),
            None if self.fail_when_drained => {
                Err(MonitorError::SourceUnavailable("回放队列已空".to_string()))
            }
            None => Ok(None),
        }
    }
}
