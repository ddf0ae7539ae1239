use async_trait::async_trait;

/// Supplies the raw extracted text of one document.
pub trait DocumentSource: Send + Sync {
    /// Name reported back as the loaded document's file name.
    fn name(&self) -> &str;
    fn read_text(&self) -> anyhow::Result<String>;
}

/// External answer generator consumed by the query pipeline.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Stable identifier of the backend/model (e.g. `chat:Qwen/Qwen2.5-72B-Instruct`).
    fn id(&self) -> &str;
    /// Produce an answer to `query` grounded on `passages`, in rank order.
    async fn generate(&self, query: &str, passages: &[String]) -> anyhow::Result<String>;
}
