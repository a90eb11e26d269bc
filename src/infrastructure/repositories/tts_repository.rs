use async_trait::async_trait;

/// Repository for TTS synthesis operations.
/// Abstracts the underlying TTS provider (OpenAI, AWS Polly, ...)
///
/// Implementations send exactly one request per call: chunking happens upstream, so
/// callers keep `text` within [`TtsRepository::max_input_chars`].
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize one chunk of text with the given voice
    ///
    /// Returns MP3 audio bytes
    ///
    /// # Errors
    /// Returns the provider's failure reason (status, network fault) as a message
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, String>;

    /// Short provider name for logs
    fn provider(&self) -> &'static str;

    /// Largest input the provider accepts in one request, in characters
    fn max_input_chars(&self) -> usize;
}
