//! HTTP request/response types and client trait.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use tokio_stream::{Stream, StreamExt};

use super::{BoxError, HttpError};
use crate::context::CallContext;

/// Function producing a fresh copy of a request body for a retry attempt.
pub type BodyRegenerator = Arc<dyn Fn() -> Result<RequestBody, BoxError> + Send + Sync>;

/// Body of an outbound request.
///
/// Either a buffered byte sequence, which can be replayed by cloning,
/// or a single-use stream, which cannot.
#[derive(Debug)]
pub struct RequestBody {
    inner: BodyInner,
}

#[derive(Debug)]
enum BodyInner {
    Bytes(Bytes),
    Stream(reqwest::Body),
}

impl RequestBody {
    /// Creates an empty body.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            inner: BodyInner::Bytes(Bytes::new()),
        }
    }

    /// Creates a buffered body.
    #[must_use]
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self {
            inner: BodyInner::Bytes(bytes.into()),
        }
    }

    /// Creates a body from a reqwest body.
    ///
    /// A reqwest body that already holds its bytes in memory is stored as a
    /// buffered body. Anything else is a single-use stream whose length is
    /// unknown, so it is never considered empty.
    #[must_use]
    pub fn from_stream(body: reqwest::Body) -> Self {
        let inner = match body.as_bytes() {
            Some(bytes) => BodyInner::Bytes(Bytes::copy_from_slice(bytes)),
            None => BodyInner::Stream(body),
        };
        Self { inner }
    }

    /// Returns true if the body is known to carry no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &self.inner {
            BodyInner::Bytes(bytes) => bytes.is_empty(),
            BodyInner::Stream(_) => false,
        }
    }

    /// Returns true if the body is a single-use stream.
    #[must_use]
    pub const fn is_stream(&self) -> bool {
        matches!(self.inner, BodyInner::Stream(_))
    }

    /// Returns the buffered bytes, or `None` for a stream.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match &self.inner {
            BodyInner::Bytes(bytes) => Some(bytes.as_ref()),
            BodyInner::Stream(_) => None,
        }
    }

    /// Clones a buffered body. Streams cannot be cloned.
    #[must_use]
    pub fn try_clone(&self) -> Option<Self> {
        match &self.inner {
            BodyInner::Bytes(bytes) => Some(Self::from_bytes(bytes.clone())),
            BodyInner::Stream(_) => None,
        }
    }

    pub(crate) fn into_reqwest(self) -> reqwest::Body {
        match self.inner {
            BodyInner::Bytes(bytes) => reqwest::Body::from(bytes),
            BodyInner::Stream(body) => body,
        }
    }
}

impl From<Bytes> for RequestBody {
    fn from(bytes: Bytes) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        Self::from_bytes(text)
    }
}

impl From<&'static str> for RequestBody {
    fn from(text: &'static str) -> Self {
        Self::from_bytes(text)
    }
}

/// Method, URL and headers of a request, without its body.
///
/// Headers are shared behind an [`Arc`]; writers go through
/// [`Arc::make_mut`], so a clone of the head never observes a later write.
#[derive(Debug, Clone)]
pub struct RequestHead {
    /// HTTP method
    pub method: http::Method,
    /// Target URL
    pub url: url::Url,
    headers: Arc<http::HeaderMap>,
}

impl RequestHead {
    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &http::HeaderMap {
        &self.headers
    }
}

/// An HTTP request to be sent.
///
/// It uses standard `http` crate types for method and headers, ensuring
/// compatibility with the broader ecosystem.
///
/// Bodies set through [`with_body`](Self::with_body) are buffered and
/// replayable. A streaming body set through
/// [`with_body_stream`](Self::with_body_stream) can only be sent once unless
/// a regenerator is supplied with
/// [`with_body_regenerator`](Self::with_body_regenerator).
pub struct HttpRequest {
    /// HTTP method (GET, POST, PUT, DELETE, etc.)
    pub method: http::Method,
    /// Target URL
    pub url: url::Url,
    headers: Arc<http::HeaderMap>,
    body: Option<RequestBody>,
    regenerate: Option<Regenerator>,
}

/// Where a request's regenerator came from.
///
/// Replacing the body drops a [`Buffered`](Self::Buffered) regenerator but
/// keeps one the caller installed.
#[derive(Clone)]
enum Regenerator {
    Buffered(BodyRegenerator),
    Caller(BodyRegenerator),
}

impl Regenerator {
    const fn get(&self) -> &BodyRegenerator {
        match self {
            Self::Buffered(f) | Self::Caller(f) => f,
        }
    }

    fn into_inner(self) -> BodyRegenerator {
        match self {
            Self::Buffered(f) | Self::Caller(f) => f,
        }
    }
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("headers", &self.headers)
            .field("body", &self.body)
            .field("replayable", &self.regenerate.is_some())
            .finish()
    }
}

impl HttpRequest {
    /// Creates a new HTTP request with the given method and URL.
    ///
    /// Headers are initialized to an empty map and body is `None`.
    #[must_use]
    pub fn new(method: http::Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: Arc::new(http::HeaderMap::new()),
            body: None,
            regenerate: None,
        }
    }

    /// Creates a GET request to the given URL.
    #[must_use]
    pub fn get(url: url::Url) -> Self {
        Self::new(http::Method::GET, url)
    }

    /// Creates a HEAD request to the given URL.
    #[must_use]
    pub fn head(url: url::Url) -> Self {
        Self::new(http::Method::HEAD, url)
    }

    /// Creates a POST request to the given URL.
    #[must_use]
    pub fn post(url: url::Url) -> Self {
        Self::new(http::Method::POST, url)
    }

    /// Creates a PUT request to the given URL.
    #[must_use]
    pub fn put(url: url::Url) -> Self {
        Self::new(http::Method::PUT, url)
    }

    /// Creates a DELETE request to the given URL.
    #[must_use]
    pub fn delete(url: url::Url) -> Self {
        Self::new(http::Method::DELETE, url)
    }

    /// Sets a buffered body.
    ///
    /// Unless the caller installed a regenerator, one that replays these
    /// bytes is installed.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        let bytes: Bytes = body.into();
        if !matches!(self.regenerate, Some(Regenerator::Caller(_))) {
            let replay = bytes.clone();
            self.regenerate = Some(Regenerator::Buffered(Arc::new(
                move || -> Result<RequestBody, BoxError> {
                    Ok(RequestBody::from_bytes(replay.clone()))
                },
            )));
        }
        self.body = Some(RequestBody::from_bytes(bytes));
        self
    }

    /// Sets a streaming body.
    ///
    /// A regenerator installed by [`with_body`](Self::with_body) is dropped;
    /// one supplied through
    /// [`with_body_regenerator`](Self::with_body_regenerator) is kept. A
    /// reqwest body already buffered in memory is treated like
    /// [`with_body`](Self::with_body).
    #[must_use]
    pub fn with_body_stream(mut self, body: reqwest::Body) -> Self {
        match RequestBody::from_stream(body).inner {
            BodyInner::Bytes(bytes) => self.with_body(bytes),
            stream @ BodyInner::Stream(_) => {
                if matches!(self.regenerate, Some(Regenerator::Buffered(_))) {
                    self.regenerate = None;
                }
                self.body = Some(RequestBody { inner: stream });
                self
            }
        }
    }

    /// Sets the function that produces a fresh body for retry attempts.
    #[must_use]
    pub fn with_body_regenerator<F>(mut self, regenerate: F) -> Self
    where
        F: Fn() -> Result<RequestBody, BoxError> + Send + Sync + 'static,
    {
        self.regenerate = Some(Regenerator::Caller(Arc::new(regenerate)));
        self
    }

    /// Adds a header to the request.
    ///
    /// If the header name already exists, the value is appended
    /// (HTTP headers can have multiple values).
    #[must_use]
    pub fn with_header(mut self, name: http::HeaderName, value: http::HeaderValue) -> Self {
        self.headers_mut().append(name, value);
        self
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &http::HeaderMap {
        &self.headers
    }

    /// Returns the headers for writing.
    ///
    /// If the map is shared with another request or head, it is copied
    /// first; the other holders keep the original.
    pub fn headers_mut(&mut self) -> &mut http::HeaderMap {
        Arc::make_mut(&mut self.headers)
    }

    /// Returns true if both requests read the same header map allocation.
    #[must_use]
    pub fn shares_headers_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.headers, &other.headers)
    }

    /// Returns the body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    /// Removes and returns the body.
    pub fn take_body(&mut self) -> Option<RequestBody> {
        self.body.take()
    }

    /// Returns the body regenerator, if any.
    #[must_use]
    pub fn regenerator(&self) -> Option<&BodyRegenerator> {
        self.regenerate.as_ref().map(Regenerator::get)
    }

    /// Clones the request if its body is absent or buffered.
    ///
    /// The clone shares the header map until either side writes to it.
    #[must_use]
    pub fn try_clone(&self) -> Option<Self> {
        let body = match &self.body {
            Some(body) => Some(body.try_clone()?),
            None => None,
        };
        Some(Self {
            method: self.method.clone(),
            url: self.url.clone(),
            headers: Arc::clone(&self.headers),
            body,
            regenerate: self.regenerate.clone(),
        })
    }

    /// Splits the request into head, body and regenerator.
    #[must_use]
    pub fn into_parts(self) -> (RequestHead, Option<RequestBody>, Option<BodyRegenerator>) {
        let head = RequestHead {
            method: self.method,
            url: self.url,
            headers: self.headers,
        };
        (head, self.body, self.regenerate.map(Regenerator::into_inner))
    }

    /// Reassembles a request from a head and a body.
    #[must_use]
    pub fn from_parts(head: RequestHead, body: Option<RequestBody>) -> Self {
        Self {
            method: head.method,
            url: head.url,
            headers: head.headers,
            body,
            regenerate: None,
        }
    }
}

type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, HttpError>> + Send>>;

/// Streamed body of an HTTP response.
///
/// Dropping the body (or calling [`close`](Self::close)) releases the
/// underlying connection.
pub struct ResponseBody {
    stream: ByteStream,
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseBody").finish_non_exhaustive()
    }
}

impl ResponseBody {
    /// Creates a body that yields no bytes.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_stream(tokio_stream::empty())
    }

    /// Creates a body from already buffered bytes.
    #[must_use]
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        let bytes: Bytes = bytes.into();
        if bytes.is_empty() {
            return Self::empty();
        }
        Self::from_stream(tokio_stream::once(Ok(bytes)))
    }

    /// Creates a body from a stream of chunks.
    #[must_use]
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, HttpError>> + Send + 'static,
    {
        Self {
            stream: Box::pin(stream),
        }
    }

    /// Reads the next chunk, or `None` at end of body.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if reading from the connection fails.
    pub async fn chunk(&mut self) -> Result<Option<Bytes>, HttpError> {
        self.stream.next().await.transpose()
    }

    /// Reads the remaining body into memory.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if reading from the connection fails.
    pub async fn bytes(mut self) -> Result<Bytes, HttpError> {
        let mut buf = Vec::new();
        while let Some(chunk) = self.chunk().await? {
            buf.extend_from_slice(&chunk);
        }
        Ok(Bytes::from(buf))
    }

    /// Reads the remaining body as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Body`] if the body is not valid UTF-8, or any
    /// error from reading the connection.
    pub async fn text(self) -> Result<String, HttpError> {
        let bytes = self.bytes().await?;
        String::from_utf8(bytes.to_vec()).map_err(|e| HttpError::Body(Box::new(e)))
    }

    /// Discards the body without reading it.
    pub fn close(self) {
        drop(self);
    }
}

/// An HTTP response received from a server.
///
/// The body is left unread; the receiver decides whether to consume it.
#[derive(Debug)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: http::StatusCode,
    /// Response headers
    pub headers: http::HeaderMap,
    /// Response body (streamed)
    pub body: ResponseBody,
}

impl HttpResponse {
    /// Creates a new HTTP response with a buffered body.
    #[must_use]
    pub fn new(status: http::StatusCode, headers: http::HeaderMap, body: impl Into<Bytes>) -> Self {
        Self::with_body(status, headers, ResponseBody::from_bytes(body))
    }

    /// Creates a new HTTP response with the given body.
    #[must_use]
    pub const fn with_body(
        status: http::StatusCode,
        headers: http::HeaderMap,
        body: ResponseBody,
    ) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Reads the whole body into memory.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if reading the body fails.
    pub async fn bytes(self) -> Result<Bytes, HttpError> {
        self.body.bytes().await
    }

    /// Reads the whole body as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if reading the body fails or it is not UTF-8.
    pub async fn text(self) -> Result<String, HttpError> {
        self.body.text().await
    }

    /// Discards the response body, releasing its connection.
    pub fn close(self) {
        self.body.close();
    }
}

/// Trait for making HTTP requests.
///
/// # Design
///
/// This trait abstracts the HTTP client implementation, enabling:
/// - Dependency injection for testing with mock clients
/// - Swapping HTTP libraries without changing calling code
/// - Adding cross-cutting concerns (request ids, tracing) via decorators
///
/// The [`CallContext`] is threaded through every call so decorators can read
/// the correlation id and honour cancellation.
///
/// # Example
///
/// ```ignore
/// use outbound_http::context::CallContext;
/// use outbound_http::transport::{HttpClient, HttpError, HttpRequest, HttpResponse};
///
/// struct StaticClient;
///
/// impl HttpClient for StaticClient {
///     async fn request(&self, _req: HttpRequest, _cx: &CallContext) -> Result<HttpResponse, HttpError> {
///         Ok(HttpResponse::new(http::StatusCode::OK, http::HeaderMap::new(), "ok"))
///     }
/// }
/// ```
pub trait HttpClient: Send + Sync {
    /// Sends an HTTP request and returns the response.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] when:
    /// - Network connection fails ([`HttpError::Connection`])
    /// - Request times out ([`HttpError::Timeout`])
    /// - The connection closes mid-exchange ([`HttpError::UnexpectedEof`])
    /// - URL is invalid ([`HttpError::InvalidUrl`])
    fn request(
        &self,
        req: HttpRequest,
        cx: &CallContext,
    ) -> impl Future<Output = Result<HttpResponse, HttpError>> + Send;
}

impl<T: HttpClient> HttpClient for Arc<T> {
    fn request(
        &self,
        req: HttpRequest,
        cx: &CallContext,
    ) -> impl Future<Output = Result<HttpResponse, HttpError>> + Send {
        (**self).request(req, cx)
    }
}

impl<T: HttpClient> HttpClient for &T {
    fn request(
        &self,
        req: HttpRequest,
        cx: &CallContext,
    ) -> impl Future<Output = Result<HttpResponse, HttpError>> + Send {
        (**self).request(req, cx)
    }
}
