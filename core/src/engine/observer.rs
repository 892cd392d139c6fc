//! Diagnostic sinks for frame events
//!
//! Observers see every change to the frame chain. They cannot influence
//! control flow.

use super::types::FrameEvent;

/// Receives frame lifecycle events
pub trait Observer {
    fn on_event(&mut self, event: &FrameEvent<'_>);
}

/// Any closure taking an event is an observer
impl<F> Observer for F
where
    F: FnMut(&FrameEvent<'_>),
{
    fn on_event(&mut self, event: &FrameEvent<'_>) {
        self(event)
    }
}

/// Emits every event through `tracing`
///
/// Failures are logged at WARN, chain structure changes at DEBUG, and the
/// per-pass resume/suspend chatter at TRACE.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn on_event(&mut self, event: &FrameEvent<'_>) {
        match event {
            FrameEvent::Failed { name } => {
                tracing::warn!(function = %name, "{}", event);
            }
            FrameEvent::Consumed { parent, name, .. } => {
                tracing::debug!(function = %name, parent = %parent, "{}", event);
            }
            FrameEvent::Created { .. }
            | FrameEvent::Completed { .. }
            | FrameEvent::Discarded { .. }
            | FrameEvent::Reset { .. } => {
                tracing::debug!(event = event.kind(), "{}", event);
            }
            FrameEvent::Resumed { .. }
            | FrameEvent::Suspended { .. }
            | FrameEvent::Ascended { .. } => {
                tracing::trace!(event = event.kind(), "{}", event);
            }
        }
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn on_event(&mut self, _event: &FrameEvent<'_>) {}
}
