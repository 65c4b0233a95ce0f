//! Stage Timeline
//!
//! Records when each pipeline stage starts and finishes so the run
//! summary can report per-stage durations.

use std::time::{Duration, Instant};

/// Type of timeline event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    /// Stage was handed to the runner
    Started,
    /// Stage exited successfully
    Completed,
    /// Stage failed to launch or exited with an error
    Failed,
}

/// A single event in the stage timeline.
#[derive(Debug, Clone)]
pub struct TimelineEvent {
    /// Name of the stage
    pub stage: String,
    /// Type of event
    pub event_type: EventType,
    /// When the event occurred
    pub timestamp: Instant,
}

/// Finished stage as reported by [`ExecutionTimeline::stage_durations`].
#[derive(Debug, Clone, PartialEq)]
pub struct StageDuration {
    pub stage: String,
    pub outcome: EventType,
    pub duration: Duration,
}

/// Ordered record of stage events for one pipeline run.
#[derive(Debug, Clone)]
pub struct ExecutionTimeline {
    events: Vec<TimelineEvent>,
    start_time: Instant,
}

impl ExecutionTimeline {
    /// Creates a new timeline starting now.
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            start_time: Instant::now(),
        }
    }

    /// Records an event for a stage.
    pub fn add_event(&mut self, stage: impl Into<String>, event_type: EventType) {
        self.events.push(TimelineEvent {
            stage: stage.into(),
            event_type,
            timestamp: Instant::now(),
        });
    }

    /// Returns all recorded events.
    pub fn get_events(&self) -> &[TimelineEvent] {
        &self.events
    }

    /// Returns the total elapsed time since timeline creation.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Returns finished stages in the order they started.
    ///
    /// A stage with a start event but no end event is omitted.
    pub fn stage_durations(&self) -> Vec<StageDuration> {
        let mut finished = Vec::new();

        for (idx, event) in self.events.iter().enumerate() {
            if event.event_type != EventType::Started {
                continue;
            }

            let end = self.events[idx + 1..].iter().find(|later| {
                later.stage == event.stage && later.event_type != EventType::Started
            });

            if let Some(end) = end {
                finished.push(StageDuration {
                    stage: event.stage.clone(),
                    outcome: end.event_type,
                    duration: end.timestamp.duration_since(event.timestamp),
                });
            }
        }

        finished
    }

    /// Renders a short plain-text summary, one line per finished stage.
    pub fn summary(&self) -> String {
        let mut output = String::new();

        for entry in self.stage_durations() {
            let status = match entry.outcome {
                EventType::Completed => "ok",
                EventType::Failed => "failed",
                EventType::Started => "running",
            };
            output.push_str(&format!(
                "{:<28} {:>7} ({} ms)\n",
                entry.stage,
                status,
                entry.duration.as_millis()
            ));
        }

        output.push_str(&format!("total: {} ms", self.elapsed().as_millis()));
        output
    }
}

impl Default for ExecutionTimeline {
    fn default() -> Self {
        Self::new()
    }
}
