use futures_util::future::BoxFuture;
use futures_util::stream::BoxStream;
use tokio_util::sync::CancellationToken;

use crate::error::DebateApiError;
use crate::payload::DebateRequest;

/// Raw response body chunks, in arrival order.
pub type ChunkStream = BoxStream<'static, Result<Vec<u8>, DebateApiError>>;

/// Pending response: resolves once status and headers are known.
pub type OpenFuture = BoxFuture<'static, Result<ChunkStream, DebateApiError>>;

/// Seam between the session controller and the network.
///
/// `open` sends one request and resolves to the body stream of a successful
/// response. A non-success response resolves to [`DebateApiError::Status`]
/// carrying the response body text. Once `cancel` fires, pending work must
/// resolve promptly with [`DebateApiError::Cancelled`]; dropping the returned
/// stream releases the connection.
pub trait DebateTransport: Send + Sync + 'static {
    fn open(&self, request: DebateRequest, cancel: CancellationToken) -> OpenFuture;
}
