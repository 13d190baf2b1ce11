//! Async input service: reads crossterm's `EventStream` on a Tokio task and
//! forwards normalized `core_events::Event`s into the editor's bounded channel.

mod async_service;
mod keys;

pub use async_service::AsyncInputShutdown;

use async_service::spawn_async_event_task;
use core_events::EventSender;
use tokio::task::JoinHandle;

/// Spawn the async input service backed by `crossterm::EventStream`.
///
/// Returns the `JoinHandle` for the background task alongside a shutdown handle
/// that can be used to request immediate termination.
pub fn spawn_async_input(
    sender: EventSender,
) -> (JoinHandle<()>, AsyncInputShutdown) {
    spawn_async_event_task(sender)
}
