use crate::keys::{map_key_event, map_mouse_event};
use core_events::{
    ASYNC_INPUT_STARTS, ASYNC_INPUT_STOP_CHANNEL, ASYNC_INPUT_STOP_ERROR, ASYNC_INPUT_STOP_SIGNAL,
    ASYNC_INPUT_STOP_STREAM, CHANNEL_SEND_FAILURES, CHANNEL_SENDS, Event, InputEvent,
    KEYPRESS_TOTAL, MOUSE_TOTAL, MouseEventKind,
};
use crossterm::event::{Event as CEvent, EventStream, KeyEventKind as CKind};
use std::io;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tokio::sync::{Notify, mpsc::Sender};
use tokio::task;
use tokio_stream::StreamExt;
use tracing::{info, trace, warn};

#[derive(Clone, Debug)]
pub struct AsyncInputShutdown {
    notify: Arc<Notify>,
}

impl AsyncInputShutdown {
    pub fn signal(&self) {
        self.notify.notify_one();
    }
}

#[derive(Clone, Debug)]
struct ShutdownListener {
    notify: Arc<Notify>,
}

impl ShutdownListener {
    fn new_pair() -> (AsyncInputShutdown, Self) {
        let notify = Arc::new(Notify::new());
        (
            AsyncInputShutdown {
                notify: notify.clone(),
            },
            ShutdownListener { notify },
        )
    }

    async fn wait(&self) {
        self.notify.notified().await;
    }
}

/// Spawn a Tokio task reading `EventStream` and forwarding normalized events.
pub(crate) fn spawn_async_event_task(
    sender: Sender<Event>,
) -> (task::JoinHandle<()>, AsyncInputShutdown) {
    let (shutdown, listener) = ShutdownListener::new_pair();
    let handle = task::spawn(async move {
        let span = tracing::debug_span!(target: "input.thread", "input_async_task");
        let _enter = span.enter();
        AsyncEventStreamTask::new(sender, EventStream::new(), listener)
            .run()
            .await;
    });
    (handle, shutdown)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExitReason {
    ShutdownSignal,
    ChannelClosed,
    StreamEnded,
    StreamError,
}

impl ExitReason {
    fn as_str(&self) -> &'static str {
        match self {
            ExitReason::ShutdownSignal => "shutdown_signal",
            ExitReason::ChannelClosed => "channel_closed",
            ExitReason::StreamEnded => "stream_ended",
            ExitReason::StreamError => "stream_error",
        }
    }
}

struct AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    sender: Sender<Event>,
    stream: S,
    shutdown: ShutdownListener,
}

impl<S> AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    fn new(sender: Sender<Event>, stream: S, shutdown: ShutdownListener) -> Self {
        Self {
            sender,
            stream,
            shutdown,
        }
    }

    async fn run(mut self) {
        info!(target: "input.thread", "async_input_task_started");
        ASYNC_INPUT_STARTS.fetch_add(1, Ordering::Relaxed);
        let reason = loop {
            let next = tokio::select! {
                biased;
                _ = self.shutdown.wait() => break ExitReason::ShutdownSignal,
                next = self.stream.next() => next,
            };
            let Some(result) = next else {
                break ExitReason::StreamEnded;
            };
            let event = match result {
                Ok(ev) => match translate(ev) {
                    Some(event) => event,
                    None => continue,
                },
                Err(err) => {
                    warn!(target: "input.thread", error_kind = ?err.kind(), "async_input_task_stream_error");
                    // The loop sees the failure as an input event and shuts down.
                    let _ = self
                        .sender
                        .send(Event::Input(InputEvent::Error(err.to_string())))
                        .await;
                    break ExitReason::StreamError;
                }
            };
            if !self.send_event(event).await {
                break ExitReason::ChannelClosed;
            }
        };

        let counter = match reason {
            ExitReason::ShutdownSignal => &ASYNC_INPUT_STOP_SIGNAL,
            ExitReason::ChannelClosed => &ASYNC_INPUT_STOP_CHANNEL,
            ExitReason::StreamEnded => &ASYNC_INPUT_STOP_STREAM,
            ExitReason::StreamError => &ASYNC_INPUT_STOP_ERROR,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        info!(target: "input.thread", reason = reason.as_str(), "async_input_task_stopped");
    }

    async fn send_event(&mut self, event: Event) -> bool {
        match self.sender.send(event).await {
            Ok(()) => {
                CHANNEL_SENDS.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(_) => {
                CHANNEL_SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }
}

/// Key releases, mouse motion and unsupported keys are dropped here.
fn translate(ev: CEvent) -> Option<Event> {
    let input = match ev {
        CEvent::Key(key) => {
            if !matches!(key.kind, CKind::Press | CKind::Repeat) {
                return None;
            }
            let key = map_key_event(&key)?;
            trace!(target: "input.event", kind = "key", chord = %key);
            KEYPRESS_TOTAL.fetch_add(1, Ordering::Relaxed);
            InputEvent::Key(key)
        }
        CEvent::Mouse(mouse) => {
            let mouse = map_mouse_event(&mouse)?;
            if matches!(mouse.kind, MouseEventKind::Moved) {
                return None;
            }
            trace!(target: "input.event", kind = "mouse", column = mouse.column, row = mouse.row);
            MOUSE_TOTAL.fetch_add(1, Ordering::Relaxed);
            InputEvent::Mouse(mouse)
        }
        CEvent::Resize(w, h) => {
            trace!(target: "input.event", w, h, "resize");
            InputEvent::Resize(w, h)
        }
        CEvent::Paste(text) => {
            trace!(target: "input.event", kind = "paste", len = text.len());
            InputEvent::Paste(text)
        }
        CEvent::FocusGained | CEvent::FocusLost => return None,
    };
    Some(Event::Input(input))
}
