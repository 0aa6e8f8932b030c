/// Line-oriented byte pipe underneath a [`super::Handle`].
///
/// Transports move whole lines and nothing else: parsing, timeouts and
/// connection state all live in the handle, so the session is agnostic to
/// whether a player sits behind a TCP socket or an in-process channel.
#[async_trait::async_trait]
pub trait Transport: Send {
    /// Deliver one line to the peer.
    async fn send(&mut self, line: String) -> std::io::Result<()>;
    /// Wait for the next line. `Ok(None)` means the peer closed cleanly.
    async fn recv(&mut self) -> std::io::Result<Option<String>>;
    /// Release the underlying connection. Idempotent.
    async fn close(&mut self);
    /// Human-readable peer description for logs.
    fn peer(&self) -> String;
}
