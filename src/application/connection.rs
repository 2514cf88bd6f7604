// Connection trait for the simulation backend
use async_trait::async_trait;

#[async_trait]
pub trait Connection: Send {
    async fn send_text(&mut self, text: &str) -> anyhow::Result<()>;

    /// Next inbound text frame, `None` once the peer has closed
    ///
    /// Must be cancel safe: the dispatcher polls it inside `select!`.
    async fn next_frame(&mut self) -> Option<anyhow::Result<String>>;
}
