// End-to-end tests for the booktape pipeline
//
// Each test gets its own temp directory tree through a test-context lifecycle hook,
// so tests run in parallel without sharing state. The TTS provider and audio codec
// are replaced with fakes: a clip is a duration header followed by the chunk text,
// which lets tests read merged segments back as the chunk sequence they contain.

mod helpers;
mod test_pipeline;
