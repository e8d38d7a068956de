#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use debate_api::{ChunkStream, DebateApiError, DebateRequest, DebateTransport, OpenFuture};
use debate_protocol::{SessionConfig, Side};
use debate_stream::{RenderMode, RenderSink, SessionController, StatusSink, StatusTone};
use futures_util::{stream, FutureExt, StreamExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

type Chunk = Result<Vec<u8>, DebateApiError>;

enum ScriptedOpen {
    Stream(mpsc::UnboundedReceiver<Chunk>),
    Fail(DebateApiError),
    Pending,
}

#[derive(Default)]
struct TransportTrace {
    script: VecDeque<ScriptedOpen>,
    requests: Vec<DebateRequest>,
    tokens: Vec<CancellationToken>,
}

/// In-memory transport. Each `open` consumes the next scripted response in
/// order; stream bodies are fed by the test through a [`StreamFeed`].
#[derive(Default)]
pub struct ScriptedTransport {
    trace: Mutex<TransportTrace>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_stream(&self) -> StreamFeed {
        let (sender, receiver) = mpsc::unbounded_channel();
        lock_unpoisoned(&self.trace)
            .script
            .push_back(ScriptedOpen::Stream(receiver));
        StreamFeed { sender }
    }

    pub fn push_failure(&self, error: DebateApiError) {
        lock_unpoisoned(&self.trace)
            .script
            .push_back(ScriptedOpen::Fail(error));
    }

    /// An open that never resolves on its own.
    pub fn push_pending(&self) {
        lock_unpoisoned(&self.trace)
            .script
            .push_back(ScriptedOpen::Pending);
    }

    pub fn requests(&self) -> Vec<DebateRequest> {
        lock_unpoisoned(&self.trace).requests.clone()
    }

    pub fn token(&self, index: usize) -> CancellationToken {
        lock_unpoisoned(&self.trace).tokens[index].clone()
    }
}

impl DebateTransport for ScriptedTransport {
    fn open(&self, request: DebateRequest, cancel: CancellationToken) -> OpenFuture {
        let scripted = {
            let mut trace = lock_unpoisoned(&self.trace);
            trace.requests.push(request);
            trace.tokens.push(cancel);
            trace.script.pop_front()
        };

        match scripted {
            Some(ScriptedOpen::Stream(receiver)) => {
                let chunks: ChunkStream = stream::unfold(receiver, |mut receiver| async move {
                    receiver.recv().await.map(|chunk| (chunk, receiver))
                })
                .boxed();
                async move { Ok::<_, DebateApiError>(chunks) }.boxed()
            }
            Some(ScriptedOpen::Fail(error)) => async move { Err::<ChunkStream, _>(error) }.boxed(),
            Some(ScriptedOpen::Pending) => {
                futures_util::future::pending::<Result<ChunkStream, DebateApiError>>().boxed()
            }
            None => async move {
                Err::<ChunkStream, _>(DebateApiError::InvalidBaseUrl(
                    "no scripted response".to_string(),
                ))
            }
            .boxed(),
        }
    }
}

pub struct StreamFeed {
    sender: mpsc::UnboundedSender<Chunk>,
}

impl StreamFeed {
    pub fn send(&self, bytes: &[u8]) {
        let _ = self.sender.send(Ok(bytes.to_vec()));
    }

    pub fn send_str(&self, text: &str) {
        self.send(text.as_bytes());
    }

    pub fn send_error(&self, error: DebateApiError) {
        let _ = self.sender.send(Err(error));
    }

    /// True once the controller has dropped the stream.
    pub fn is_released(&self) -> bool {
        self.sender.is_closed()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTurn {
    pub side: Side,
    pub content: String,
    pub mode: RenderMode,
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub rendered: Vec<RenderedTurn>,
    pub statuses: Vec<(String, Option<StatusTone>)>,
    pub clears: usize,
}

impl RecordingSink {
    pub fn last_status(&self) -> Option<(&str, Option<StatusTone>)> {
        self.statuses
            .last()
            .map(|(text, tone)| (text.as_str(), *tone))
    }

    pub fn rendered_contents(&self) -> Vec<&str> {
        self.rendered
            .iter()
            .map(|turn| turn.content.as_str())
            .collect()
    }
}

impl RenderSink for RecordingSink {
    fn render(&mut self, side: Side, content: &str, mode: RenderMode) {
        self.rendered.push(RenderedTurn {
            side,
            content: content.to_string(),
            mode,
        });
    }

    fn clear(&mut self) {
        self.rendered.clear();
        self.clears += 1;
    }
}

impl StatusSink for RecordingSink {
    fn report_status(&mut self, text: &str, tone: Option<StatusTone>) {
        self.statuses.push((text.to_string(), tone));
    }
}

pub fn controller_with(transport: &Arc<ScriptedTransport>) -> SessionController<RecordingSink> {
    let transport: Arc<dyn DebateTransport> = transport.clone();
    SessionController::new(transport, RecordingSink::default())
}

pub fn config(topic: &str) -> SessionConfig {
    SessionConfig::new(topic)
        .with_pro_system("argue in favour")
        .with_con_system("argue against")
        .with_rounds(2)
}

pub fn message_line(side: &str, content: &str) -> String {
    format!(
        "{}\n",
        serde_json::json!({"type": "message", "side": side, "content": content})
    )
}

pub const DONE_LINE: &str = "{\"type\":\"done\"}\n";

pub fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
