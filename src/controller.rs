//! Live session lifecycle.
//!
//! A [`SessionController`] owns at most one stream. The stream is advanced by
//! [`SessionController::pump`], which awaits exactly one transport step and then
//! applies everything that step produced synchronously. Dropping a `pump`
//! future before it resolves loses nothing: the pending open or read stays in
//! the controller and is resumed by the next call.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use debate_api::client::await_or_cancel;
use debate_api::{
    parse_event_line, ChunkStream, DebateApiError, DebateRequest, DebateTransport, LineFramer,
    OpenFuture, ProtocolEvent,
};
use debate_protocol::{ConfigError, SessionConfig, Side};
use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;
use transcript_store::{
    export_file_name, now_rfc3339, now_unix_millis, DocumentCodec, ExportDocument,
    TranscriptStore,
};

use crate::error::SessionError;
use crate::sink::{RenderMode, SessionSink, StatusTone};
use crate::state::{Controls, SessionState};
use crate::status;

type StreamId = u64;

struct ActiveStream {
    id: StreamId,
    cancel: CancellationToken,
    phase: StreamPhase,
}

enum StreamPhase {
    Connecting(OpenFuture),
    Reading {
        chunks: ChunkStream,
        framer: LineFramer,
    },
}

enum StreamStep {
    Opened(Result<ChunkStream, DebateApiError>),
    Chunk(Result<Vec<u8>, DebateApiError>),
    Ended,
}

pub struct SessionController<S> {
    transport: Arc<dyn DebateTransport>,
    sink: S,
    state: SessionState,
    config: Option<SessionConfig>,
    start_time: Option<String>,
    transcript: TranscriptStore,
    render_mode: RenderMode,
    active: Option<ActiveStream>,
    next_stream_id: StreamId,
    failure: Option<SessionError>,
}

impl<S: SessionSink> SessionController<S> {
    pub fn new(transport: Arc<dyn DebateTransport>, sink: S) -> Self {
        Self {
            transport,
            sink,
            state: SessionState::Idle,
            config: None,
            start_time: None,
            transcript: TranscriptStore::new(),
            render_mode: RenderMode::default(),
            active: None,
            next_stream_id: 1,
            failure: None,
        }
    }

    #[must_use]
    pub fn with_render_mode(mut self, mode: RenderMode) -> Self {
        self.render_mode = mode;
        self
    }

    /// Starts a new session, replacing any previous one.
    ///
    /// The config is normalized and validated first; an invalid config changes
    /// nothing. Otherwise an in-flight stream is cancelled and released before
    /// the transcript is reset, so no event from it can reach the new session.
    pub fn start(&mut self, config: SessionConfig) -> Result<(), SessionError> {
        let config = config.normalized();
        if let Err(error) = config.validate() {
            self.report_config_error(&error);
            return Err(error.into());
        }

        self.cancel_active("superseded by a new session");
        self.transcript.clear();
        self.sink.clear();

        let request = DebateRequest::new(&config);
        tracing::info!(
            topic = %config.topic,
            rounds = config.rounds,
            temperature = config.temperature,
            "starting debate session"
        );
        self.config = Some(config);
        self.start_time = Some(now_rfc3339());
        self.open_stream(request);
        Ok(())
    }

    /// Cancels the active stream. Returns `false`, doing nothing, when no
    /// stream is active.
    pub fn stop(&mut self) -> bool {
        if !self.cancel_active("stopped by user") {
            return false;
        }
        self.mark_stopped();
        true
    }

    /// Resumes from a stopped, errored or finished session by resubmitting the
    /// stored config and every prior turn.
    pub fn continue_session(&mut self) -> Result<(), SessionError> {
        let request = match &self.config {
            Some(config) if self.can_continue() => {
                DebateRequest::continuation(config, self.transcript.entries())
            }
            _ => {
                self.sink
                    .report_status(status::NOTHING_TO_CONTINUE, Some(StatusTone::Error));
                return Err(SessionError::Precondition(status::NOTHING_TO_CONTINUE));
            }
        };

        tracing::info!(
            prior_turns = request.prior_turns(),
            from_state = %self.state,
            "continuing debate session"
        );
        self.open_stream(request);
        Ok(())
    }

    /// Advances the active stream by one transport step.
    ///
    /// Returns `false` without waiting when no stream is active.
    pub async fn pump(&mut self) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        let stream_id = active.id;

        let step = match &mut active.phase {
            StreamPhase::Connecting(open) => {
                StreamStep::Opened(await_or_cancel(open, &active.cancel).await.and_then(|r| r))
            }
            StreamPhase::Reading { chunks, .. } => {
                match await_or_cancel(chunks.next(), &active.cancel).await {
                    Ok(Some(chunk)) => StreamStep::Chunk(chunk),
                    Ok(None) => StreamStep::Ended,
                    Err(error) => StreamStep::Chunk(Err(error)),
                }
            }
        };

        self.apply_step(stream_id, step);
        true
    }

    /// Pumps until no stream is active and returns the resulting state.
    pub async fn run_until_idle(&mut self) -> SessionState {
        while self.pump().await {}
        self.state
    }

    /// Token of the active stream. Cancelling it has the same effect as
    /// [`stop`](Self::stop) once the controller is next pumped.
    pub fn cancel_handle(&self) -> Option<CancellationToken> {
        self.active.as_ref().map(|active| active.cancel.clone())
    }

    /// Snapshot of the current session for export.
    pub fn export_document(&mut self) -> Result<ExportDocument, SessionError> {
        let config = match &self.config {
            Some(config) if !self.transcript.is_empty() => config,
            _ => {
                self.sink
                    .report_status(status::NOTHING_TO_EXPORT, Some(StatusTone::Error));
                return Err(SessionError::Precondition(status::NOTHING_TO_EXPORT));
            }
        };

        Ok(DocumentCodec::export(
            config,
            self.start_time.as_deref(),
            self.transcript.turns(),
        )?)
    }

    /// Writes the export document to `path`.
    pub fn export_to_file(&mut self, path: &Path) -> Result<(), SessionError> {
        let document = self.export_document()?;
        if let Err(error) = DocumentCodec::write_to(path, &document) {
            self.report_error(&error.to_string());
            return Err(error.into());
        }
        tracing::info!(path = %path.display(), turns = document.total_rounds, "exported debate record");
        self.sink.report_status(status::EXPORTED, None);
        Ok(())
    }

    /// Writes the export document into `dir` under its default file name.
    pub fn export_to_dir(&mut self, dir: &Path) -> Result<PathBuf, SessionError> {
        let topic = self
            .config
            .as_ref()
            .map(|config| config.topic.as_str())
            .unwrap_or_default();
        let path = dir.join(export_file_name(topic, now_unix_millis()));
        self.export_to_file(&path)?;
        Ok(path)
    }

    /// Applies to turns rendered from now on.
    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.render_mode = mode;
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn controls(&self) -> Controls {
        Controls::project(self.state, self.transcript.len())
    }

    pub fn can_continue(&self) -> bool {
        self.config.is_some() && self.state.allows_continue() && !self.transcript.is_empty()
    }

    pub fn is_streaming(&self) -> bool {
        self.active.is_some()
    }

    pub fn transcript(&self) -> &TranscriptStore {
        &self.transcript
    }

    pub fn config(&self) -> Option<&SessionConfig> {
        self.config.as_ref()
    }

    pub fn start_time(&self) -> Option<&str> {
        self.start_time.as_deref()
    }

    /// Why the session last entered [`SessionState::Errored`].
    pub fn failure(&self) -> Option<&SessionError> {
        self.failure.as_ref()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn open_stream(&mut self, request: DebateRequest) {
        let id = self.next_stream_id;
        self.next_stream_id += 1;

        let cancel = CancellationToken::new();
        let open = self.transport.open(request, cancel.clone());
        self.active = Some(ActiveStream {
            id,
            cancel,
            phase: StreamPhase::Connecting(open),
        });
        self.failure = None;
        self.state = SessionState::Running;
        self.sink
            .report_status(status::IN_PROGRESS, Some(StatusTone::Running));
    }

    /// Cancels and drops the active stream, if any.
    fn cancel_active(&mut self, reason: &'static str) -> bool {
        let Some(active) = self.active.take() else {
            return false;
        };
        active.cancel.cancel();
        tracing::info!(stream_id = active.id, reason, "cancelled debate stream");
        true
    }

    fn is_current(&self, stream_id: StreamId) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| active.id == stream_id)
    }

    fn apply_step(&mut self, stream_id: StreamId, step: StreamStep) {
        if !self.is_current(stream_id) {
            return;
        }

        match step {
            StreamStep::Opened(Ok(chunks)) => {
                tracing::debug!(stream_id, "debate stream opened");
                if let Some(active) = self.active.as_mut() {
                    active.phase = StreamPhase::Reading {
                        chunks,
                        framer: LineFramer::default(),
                    };
                }
            }
            StreamStep::Opened(Err(error)) | StreamStep::Chunk(Err(error)) => {
                self.finish_with_transport_error(error);
            }
            StreamStep::Chunk(Ok(bytes)) => self.apply_chunk(stream_id, &bytes),
            StreamStep::Ended => self.finish_without_terminal(),
        }
    }

    fn apply_chunk(&mut self, stream_id: StreamId, bytes: &[u8]) {
        let lines = match self.active.as_mut().map(|active| &mut active.phase) {
            Some(StreamPhase::Reading { framer, .. }) => framer.feed(bytes),
            _ => return,
        };

        for line in lines {
            // A terminal event releases the stream; anything after it is ignored.
            if !self.is_current(stream_id) {
                break;
            }
            if let Some(event) = parse_event_line(&line) {
                self.apply_event(event);
            }
        }
    }

    fn apply_event(&mut self, event: ProtocolEvent) {
        match event {
            ProtocolEvent::Message { side, content } => self.apply_message(side, content),
            ProtocolEvent::Error { message } => {
                self.cancel_active("service reported an error");
                tracing::warn!(%message, turns = self.transcript.len(), "debate service reported an error");
                self.report_error(&message);
                self.failure = Some(SessionError::Protocol(message));
                self.state = SessionState::Errored;
            }
            ProtocolEvent::Done { count } => {
                self.cancel_active("debate finished");
                tracing::info!(turns = self.transcript.len(), reported = ?count, "debate finished");
                self.state = SessionState::Done;
                self.sink.report_status(status::FINISHED, None);
            }
        }
    }

    fn apply_message(&mut self, side: Side, content: String) {
        if content.is_empty() {
            tracing::debug!(%side, "dropping empty message event");
            return;
        }
        let turn = self.transcript.append(side, content);
        self.sink.render(turn.side, &turn.content, self.render_mode);
    }

    fn finish_with_transport_error(&mut self, error: DebateApiError) {
        self.active = None;
        if error.is_cancelled() {
            self.mark_stopped();
            return;
        }

        tracing::warn!(%error, turns = self.transcript.len(), "debate stream failed");
        self.report_error(&error.user_message());
        self.failure = Some(SessionError::Transport(error));
        self.state = SessionState::Errored;
    }

    fn finish_without_terminal(&mut self) {
        if let Some(ActiveStream {
            phase: StreamPhase::Reading { mut framer, .. },
            ..
        }) = self.active.take()
        {
            let discarded = framer.finish();
            if discarded > 0 {
                tracing::debug!(discarded, "discarding unterminated trailing line");
            }
        }

        let error = SessionError::IncompleteStream;
        tracing::warn!(turns = self.transcript.len(), "{error}");
        self.report_error(&error.user_message());
        self.failure = Some(error);
        self.state = SessionState::Errored;
    }

    fn mark_stopped(&mut self) {
        tracing::info!(turns = self.transcript.len(), "debate session stopped");
        self.state = SessionState::Stopped;
        self.sink.report_status(status::STOPPED, None);
    }

    fn report_error(&mut self, message: &str) {
        self.sink
            .report_status(&status::error_line(message), Some(StatusTone::Error));
    }

    fn report_config_error(&mut self, error: &ConfigError) {
        let text = match error {
            ConfigError::EmptyTopic => error.to_string(),
            other => status::error_line(&other.to_string()),
        };
        self.sink.report_status(&text, Some(StatusTone::Error));
    }
}
