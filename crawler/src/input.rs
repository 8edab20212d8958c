//! Input collaborator interface and a scripted implementation.
//!
//! Raw device polling lives outside the core. The controller only needs one
//! [`MotionInput`] per physics tick plus the one-shot [`ControlEvent`]s that the
//! surrounding session consumes.

use crate::types::MotionInput;

/// One-shot commands that are not part of the continuous motion axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlEvent {
    ToggleCamera,
    ToggleCleaning,
    ToggleCutting,
    /// Select a linear speed preset by its 1-based slot.
    SpeedPreset(u8),
    Exit,
}

/// Source of per-tick motion input.
///
/// `sample` is called exactly once per physics tick and must not block. A disabled
/// source yields [`MotionInput::ZERO`]; one-shot events are still delivered so that
/// exit and similar commands keep working.
pub trait InputSource {
    fn sample(&mut self) -> MotionInput;

    fn set_enabled(&mut self, enabled: bool);

    fn is_enabled(&self) -> bool;

    /// Next pending one-shot event for the current tick, if any.
    fn next_event(&mut self) -> Option<ControlEvent> {
        None
    }
}

#[derive(Clone, Copy, Debug)]
struct Segment {
    start: u64,
    end: u64,
    input: MotionInput,
}

/// Plays back a fixed timeline of held inputs and scheduled events.
///
/// Ticks are counted by calls to [`InputSource::sample`]. Events scheduled for tick `t`
/// are returned by `next_event` before the `t`-th sample.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    segments: Vec<Segment>,
    events: Vec<(u64, ControlEvent)>,
    next_event: usize,
    tick: u64,
    length: u64,
    disabled: bool,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `ticks` ticks of constant `input` to the end of the timeline.
    pub fn hold(mut self, ticks: u64, input: MotionInput) -> Self {
        self.segments.push(Segment {
            start: self.length,
            end: self.length + ticks,
            input,
        });
        self.length += ticks;
        self
    }

    /// Append `ticks` ticks of neutral input.
    pub fn idle(self, ticks: u64) -> Self {
        self.hold(ticks, MotionInput::ZERO)
    }

    /// Schedule `event` to fire at the start of `tick`.
    pub fn at(mut self, tick: u64, event: ControlEvent) -> Self {
        // Stable insert keeps same-tick events in the order they were scheduled.
        let idx = self.events.partition_point(|(t, _)| *t <= tick);
        self.events.insert(idx, (tick, event));
        self
    }

    /// Total scripted ticks. Sampling past the end yields neutral input.
    #[inline]
    pub fn len(&self) -> u64 {
        self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Index of the tick the next `sample` call will read.
    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.tick >= self.length && self.next_event >= self.events.len()
    }

    fn input_at(&self, tick: u64) -> MotionInput {
        self.segments
            .iter()
            .find(|s| (s.start..s.end).contains(&tick))
            .map(|s| s.input)
            .unwrap_or(MotionInput::ZERO)
    }
}

impl InputSource for ScriptedInput {
    fn sample(&mut self) -> MotionInput {
        let input = if self.disabled {
            MotionInput::ZERO
        } else {
            self.input_at(self.tick)
        };
        self.tick += 1;
        input
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.disabled = !enabled;
    }

    fn is_enabled(&self) -> bool {
        !self.disabled
    }

    fn next_event(&mut self) -> Option<ControlEvent> {
        let (tick, event) = *self.events.get(self.next_event)?;
        if tick > self.tick {
            return None;
        }
        self.next_event += 1;
        Some(event)
    }
}
