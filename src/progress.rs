//! Progress side channel for frame decoding.
//!
//! Callers pass an optional `FnMut(current, total)`.  `total` is 0 while the
//! final frame count is unknown, which is the case for complete saves where
//! sub-frames are discovered as the payload is walked.
//!
//! The callback is outside the decoder's control, so [`ProgressSink`] runs it
//! under `catch_unwind`: a panicking callback is logged and silenced for the
//! rest of the load, and decoding carries on unaffected.

use std::panic::{catch_unwind, AssertUnwindSafe};

pub type ProgressFn<'a> = dyn FnMut(usize /*current*/, usize /*total*/) + 'a;

pub struct ProgressSink<'a> {
    callback: Option<&'a mut ProgressFn<'a>>,
}

impl<'a> ProgressSink<'a> {
    pub fn new<'f: 'a>(callback: Option<&'a mut ProgressFn<'f>>) -> Self {
        Self { callback: callback.map(|cb| cb as &'a mut ProgressFn<'a>) }
    }

    pub fn none() -> Self {
        Self { callback: None }
    }

    pub fn report(&mut self, current: usize, total: usize) {
        let Some(cb) = self.callback.as_mut() else { return };
        if catch_unwind(AssertUnwindSafe(|| cb(current, total))).is_err() {
            tracing::warn!(current, total, "progress callback panicked; further progress suppressed");
            self.callback = None;
        }
    }
}
