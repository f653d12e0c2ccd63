// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tether Contributors

//! Resilient duplex messaging client.
//!
//! Provides a high-level interface for:
//! - Sending payloads (with offline queue fallback)
//! - Receiving and dispatching inbound payloads
//! - Heartbeat liveness probes with latency tracking
//! - Automatic reconnection with exponential backoff
//!
//! # Concurrency model
//!
//! Single-threaded and event-driven: transport events and timer firings are
//! processed as discrete handler calls that mutate the client directly, so
//! no locking is needed. The [`Client::run`] loop is the production driver;
//! tests drive the same handlers synchronously.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use tether_core::codec::unix_millis;
use tether_core::{codec, Codec, Envelope, Payload};

use crate::dispatch::{Router, StatusSink, TracingSink};
use crate::heartbeat::HeartbeatMonitor;
use crate::queue::{OutboundQueue, QueueError};
use crate::reconnect::{ConnectionState, ErrorAction, ReconnectController, RetryTimer};
use crate::transport::{Transport, TransportError, WebSocketTransport};

/// Configuration for the client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// URL of the remote endpoint.
    pub url: String,
    /// Interval between heartbeat probes (milliseconds).
    pub heartbeat_interval_ms: u64,
    /// Initial reconnect delay (milliseconds).
    pub initial_delay_ms: u64,
    /// Maximum reconnect delay (milliseconds).
    pub max_delay_ms: u64,
    /// Optional bound on the outbound queue; `None` means unbounded.
    pub queue_capacity: Option<usize>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            url: "ws://localhost:8765".to_string(),
            heartbeat_interval_ms: 30_000,
            initial_delay_ms: 1_000,
            max_delay_ms: 30_000,
            queue_capacity: None,
        }
    }
}

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Outbound payload could not be serialized.
    #[error("codec error: {0}")]
    Codec(#[from] tether_core::Error),

    /// Outbound queue rejected the frame.
    #[error("queue error: {0}")]
    Queue(#[from] QueueError),

    /// Receive called while not connected.
    #[error("not connected to remote endpoint")]
    NotConnected,

    /// Operation on a disposed client.
    #[error("client has been disposed")]
    Disposed,
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Resilient messaging client over a reconnecting transport.
pub struct Client<T: Transport = WebSocketTransport> {
    /// Configuration.
    config: ClientConfig,
    /// Transport layer.
    transport: T,
    /// Outbound codec (correlation-id assignment).
    codec: Codec,
    /// Frames awaiting an open connection.
    queue: OutboundQueue,
    /// Lifecycle state machine.
    controller: ReconnectController,
    /// Liveness probe bookkeeping.
    monitor: HeartbeatMonitor,
    /// Inbound status projection.
    router: Router,
}

impl Client<WebSocketTransport> {
    /// Create a client with the default WebSocket transport and trace-log
    /// status reporting.
    pub fn new(config: ClientConfig) -> Self {
        Client::with_transport_and_sink(config, WebSocketTransport::new(), Box::new(TracingSink))
    }

    /// Create a client with the default transport and a custom status sink.
    pub fn with_status_sink(config: ClientConfig, sink: Box<dyn StatusSink>) -> Self {
        Client::with_transport_and_sink(config, WebSocketTransport::new(), sink)
    }
}

impl<T: Transport> Client<T> {
    /// Create a client with a custom transport (for testing).
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Client::with_transport_and_sink(config, transport, Box::new(TracingSink))
    }

    /// Create a client with a custom transport and status sink.
    pub fn with_transport_and_sink(
        config: ClientConfig,
        transport: T,
        sink: Box<dyn StatusSink>,
    ) -> Self {
        let queue = match config.queue_capacity {
            Some(capacity) => OutboundQueue::with_capacity(capacity),
            None => OutboundQueue::new(),
        };
        let controller = ReconnectController::new(
            Duration::from_millis(config.initial_delay_ms),
            Duration::from_millis(config.max_delay_ms),
        );
        let monitor = HeartbeatMonitor::new(Duration::from_millis(config.heartbeat_interval_ms));

        Client {
            config,
            transport,
            codec: Codec::new(),
            queue,
            controller,
            monitor,
            router: Router::new(sink),
        }
    }

    /// Get the current connection state.
    pub fn state(&self) -> ConnectionState {
        self.controller.state()
    }

    /// Check if the channel is ready for immediate transmission.
    pub fn is_open(&self) -> bool {
        self.controller.is_open() && self.transport.is_connected()
    }

    /// Last measured heartbeat round-trip latency.
    pub fn latency(&self) -> Option<Duration> {
        self.monitor.latency()
    }

    /// Number of frames waiting for the next open transition.
    pub fn pending_messages(&self) -> usize {
        self.queue.len()
    }

    /// Current connection generation (advances per connection attempt).
    pub fn generation(&self) -> u64 {
        self.controller.generation()
    }

    /// The retry timer awaiting its delay, if any.
    pub fn pending_timer(&self) -> Option<RetryTimer> {
        self.controller.pending_timer()
    }

    /// Send a payload, assigning a correlation id if absent.
    ///
    /// Transmitted immediately when the connection is open, otherwise
    /// queued for the next open transition. Serialization failure is a hard
    /// error; the payload is never queued in that case.
    pub async fn send(&mut self, payload: impl Into<Envelope>) -> ClientResult<()> {
        if self.state() == ConnectionState::Closed {
            return Err(ClientError::Disposed);
        }
        let frame = self.codec.encode(payload.into())?;
        self.transmit_or_queue(frame).await
    }

    /// Send a payload through the reversible-transform path.
    ///
    /// Shares the queuing and open-state gating of [`Client::send`].
    pub async fn send_compressed(&mut self, payload: impl Into<Envelope>) -> ClientResult<()> {
        if self.state() == ConnectionState::Closed {
            return Err(ClientError::Disposed);
        }
        let frame = self.codec.encode_compressed(payload.into())?;
        self.transmit_or_queue(frame).await
    }

    async fn transmit_or_queue(&mut self, frame: String) -> ClientResult<()> {
        if self.is_open() {
            if let Err(e) = self.transport.send(frame.clone()).await {
                // The wire broke under us: keep the frame and take the
                // normal disconnection path.
                warn!("send failed, queueing frame: {e}");
                self.queue.push(frame)?;
                self.handle_error().await?;
            }
            Ok(())
        } else {
            self.queue.push(frame)?;
            Ok(())
        }
    }

    /// Attempt one transport connection.
    ///
    /// On success runs the open transition (backoff reset, queue flush); on
    /// failure schedules the next retry and returns normally. Connection
    /// failures are never surfaced as hard errors.
    pub async fn connect(&mut self) -> ClientResult<()> {
        if self.state() == ConnectionState::Closed {
            return Err(ClientError::Disposed);
        }
        match self.transport.connect(&self.config.url).await {
            Ok(()) => self.handle_open().await,
            Err(e) => {
                warn!("connect attempt failed: {e}");
                self.handle_close();
                Ok(())
            }
        }
    }

    /// Transport open event: reset backoff and drain the queue.
    pub async fn handle_open(&mut self) -> ClientResult<()> {
        self.controller.on_open();
        info!("connection established");
        self.flush_queue().await?;
        Ok(())
    }

    /// Transport close event.
    ///
    /// Enters `Reconnecting` and returns the retry timer to wait out, or
    /// `None` when a retry is already pending (idempotent under repeated
    /// close events).
    pub fn handle_close(&mut self) -> Option<RetryTimer> {
        let timer = self.controller.on_close();
        if let Some(timer) = timer {
            debug!(
                generation = timer.generation,
                delay_ms = timer.delay.as_millis() as u64,
                "scheduling reconnect"
            );
        }
        timer
    }

    /// Transport error event.
    ///
    /// First failure of a cycle schedules a retry like a close; an error
    /// while already reconnecting force-closes the transport instead of
    /// scheduling a duplicate timer.
    pub async fn handle_error(&mut self) -> ClientResult<Option<RetryTimer>> {
        match self.controller.on_error() {
            ErrorAction::Retry(timer) => {
                debug!(
                    generation = timer.generation,
                    delay_ms = timer.delay.as_millis() as u64,
                    "scheduling reconnect after error"
                );
                Ok(Some(timer))
            }
            ErrorAction::CloseTransport => {
                debug!("error while reconnecting, forcing transport closed");
                self.transport.disconnect().await?;
                Ok(None)
            }
            ErrorAction::Ignore => Ok(None),
        }
    }

    /// A retry timer fired. Returns true when a new attempt should begin;
    /// false when the timer was stale and has been discarded.
    pub fn retry_elapsed(&mut self, generation: u64) -> bool {
        self.controller.retry_elapsed(generation)
    }

    /// Process one inbound frame.
    ///
    /// Malformed frames are logged and dropped; they never abort the
    /// dispatch path or the connection.
    pub fn handle_message(&mut self, text: &str) -> Option<Envelope> {
        match codec::decode(text) {
            Ok(envelope) => {
                self.router.dispatch(&envelope, &mut self.monitor);
                Some(envelope)
            }
            Err(e) => {
                warn!("discarding malformed inbound frame: {e}");
                None
            }
        }
    }

    /// Receive and dispatch one frame from the transport.
    ///
    /// Returns the decoded envelope, or `None` on a malformed frame or when
    /// the connection dropped (in which case the reconnect path has already
    /// been taken).
    pub async fn recv(&mut self) -> ClientResult<Option<Envelope>> {
        if !self.is_open() {
            return Err(ClientError::NotConnected);
        }
        match self.transport.recv().await {
            Ok(Some(text)) => Ok(self.handle_message(&text)),
            Ok(None) => {
                info!("connection closed by peer");
                self.handle_close();
                Ok(None)
            }
            Err(e) => {
                warn!("transport error: {e}");
                self.handle_error().await?;
                Ok(None)
            }
        }
    }

    /// Transmit one heartbeat probe. No-op while not open.
    pub async fn send_probe(&mut self) -> ClientResult<()> {
        if !self.is_open() {
            return Ok(());
        }
        // Probes are matched by kind, not correlation id: skip assignment.
        let frame = Envelope::new(self.monitor.probe(unix_millis()))
            .to_json()
            .map_err(tether_core::Error::from)?;
        if let Err(e) = self.transport.send(frame).await {
            warn!("heartbeat send failed: {e}");
            self.handle_error().await?;
        }
        Ok(())
    }

    /// Drain the queue strictly FIFO while the connection stays open.
    ///
    /// Stops immediately if the connection drops mid-drain; the remaining
    /// frames keep their order for the next open transition. Returns the
    /// number of frames transmitted.
    pub async fn flush_queue(&mut self) -> ClientResult<usize> {
        let mut sent = 0;
        while self.is_open() {
            let Some(frame) = self.queue.pop() else {
                break;
            };
            match self.transport.send(frame.clone()).await {
                Ok(()) => sent += 1,
                Err(e) => {
                    self.queue.push_front(frame);
                    warn!("flush interrupted after {sent} frames: {e}");
                    self.handle_error().await?;
                    break;
                }
            }
        }
        if sent > 0 {
            debug!("flushed {sent} queued frames");
        }
        Ok(sent)
    }

    /// Dispose the client: cancel pending work and close the transport.
    ///
    /// Terminal; no further connection attempts will be scheduled.
    pub async fn dispose(&mut self) -> ClientResult<()> {
        self.controller.dispose();
        self.transport.disconnect().await?;
        info!("client disposed");
        Ok(())
    }

    /// Production event loop: connect, pump events, reconnect on failure.
    ///
    /// Runs until the client is disposed. All timers honor the generation
    /// guard, so a sleep that outlives its connection attempt is discarded
    /// on wake instead of spawning a duplicate attempt.
    pub async fn run(&mut self) -> ClientResult<()> {
        // No interactive input: the channel is born closed.
        let (_, input) = mpsc::unbounded_channel();
        self.run_with_input(input).await
    }

    /// [`Client::run`] with a line input channel.
    ///
    /// Each line becomes a text payload sent through the normal path, so
    /// lines arriving during an outage are queued and flushed on recovery.
    /// The loop keeps running after the input channel closes.
    pub async fn run_with_input(
        &mut self,
        mut input: mpsc::UnboundedReceiver<String>,
    ) -> ClientResult<()> {
        let mut input_open = true;
        loop {
            match self.state() {
                ConnectionState::Connecting => {
                    self.connect().await?;
                }
                ConnectionState::Open => {
                    self.run_open(&mut input, &mut input_open).await?;
                }
                ConnectionState::Reconnecting => {
                    let Some(timer) = self.controller.pending_timer() else {
                        return Ok(());
                    };
                    self.wait_retry(timer, &mut input, &mut input_open).await?;
                }
                ConnectionState::Closed => return Ok(()),
            }
        }
    }

    /// Wait out a retry delay, still accepting input lines for the queue.
    async fn wait_retry(
        &mut self,
        timer: RetryTimer,
        input: &mut mpsc::UnboundedReceiver<String>,
        input_open: &mut bool,
    ) -> ClientResult<()> {
        enum Wake {
            Elapsed,
            Input(Option<String>),
        }

        let deadline = tokio::time::Instant::now() + timer.delay;
        loop {
            let wake = tokio::select! {
                _ = tokio::time::sleep_until(deadline) => Wake::Elapsed,
                line = input.recv(), if *input_open => Wake::Input(line),
            };
            match wake {
                Wake::Elapsed => {
                    self.retry_elapsed(timer.generation);
                    return Ok(());
                }
                Wake::Input(Some(line)) => {
                    self.send(Payload::text(line)).await?;
                }
                Wake::Input(None) => *input_open = false,
            }
        }
    }

    /// Pump transport frames, heartbeat ticks, and input lines while open.
    async fn run_open(
        &mut self,
        input: &mut mpsc::UnboundedReceiver<String>,
        input_open: &mut bool,
    ) -> ClientResult<()> {
        enum Wake {
            Frame(Option<String>),
            TransportErr(TransportError),
            Heartbeat,
            Input(Option<String>),
        }

        // The first tick completes immediately: a probe goes out as soon as
        // the connection opens.
        let mut heartbeat = tokio::time::interval(self.monitor.interval());

        while self.is_open() {
            let wake = tokio::select! {
                frame = self.transport.recv() => match frame {
                    Ok(frame) => Wake::Frame(frame),
                    Err(e) => Wake::TransportErr(e),
                },
                _ = heartbeat.tick() => Wake::Heartbeat,
                line = input.recv(), if *input_open => Wake::Input(line),
            };
            match wake {
                Wake::Frame(Some(text)) => {
                    self.handle_message(&text);
                }
                Wake::Frame(None) => {
                    info!("connection closed by peer");
                    self.handle_close();
                }
                Wake::TransportErr(e) => {
                    warn!("transport error: {e}");
                    self.handle_error().await?;
                }
                // Dropping out of Open stops the ticker with this loop, so
                // no probe is ever scheduled while reconnecting.
                Wake::Heartbeat => self.send_probe().await?,
                Wake::Input(Some(line)) => {
                    self.send(Payload::text(line)).await?;
                }
                Wake::Input(None) => *input_open = false,
            }
        }
        Ok(())
    }
}
