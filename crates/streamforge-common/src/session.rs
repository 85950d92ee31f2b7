//! Full and progressive front-ends.
//!
//! Both front-ends drive the same [`Engine`]: a session that accepts bytes and
//! is finalized into a model. The full parser runs a whole session per call;
//! the progressive parser keeps one open across `push` calls until `done`.

use crate::error::Result;
use crate::options::ParseOptions;
use tracing::debug;

/// One parse session of a manifest format.
pub trait Engine: Sized {
    /// Caller configuration shared by every session.
    type Config: Clone;

    /// The finished model.
    type Output;

    /// Start a session.
    fn start(config: Self::Config, options: &ParseOptions) -> Self;

    /// Consume a chunk of input.
    fn feed(&mut self, chunk: &[u8]) -> Result<()>;

    /// Flush pending state and return the model.
    fn finish(self) -> Result<Self::Output>;
}

/// Parses a whole document per call.
pub struct FullParser<E: Engine> {
    config: E::Config,
}

impl<E: Engine> FullParser<E> {
    /// Create a parser with the given configuration.
    pub fn new(config: E::Config) -> Self {
        Self { config }
    }

    /// The parser configuration.
    pub fn config(&self) -> &E::Config {
        &self.config
    }

    /// Parse `input` as one document.
    ///
    /// A trailing newline is injected so a last line without one is flushed.
    pub fn parse(&self, input: impl AsRef<[u8]>, options: &ParseOptions) -> Result<E::Output> {
        let input = input.as_ref();
        debug!(bytes = input.len(), base_url = %options.base_url, "full parse");
        let mut session = E::start(self.config.clone(), options);
        session.feed(input)?;
        session.feed(b"\n")?;
        session.finish()
    }
}

impl<E: Engine> Default for FullParser<E>
where
    E::Config: Default,
{
    fn default() -> Self {
        Self::new(E::Config::default())
    }
}

impl<E: Engine> Clone for FullParser<E> {
    fn clone(&self) -> Self {
        Self::new(self.config.clone())
    }
}

/// Parses a document delivered in chunks.
///
/// The first [`push`](Self::push) starts a session, [`done`](Self::done)
/// finalizes it. A hook error aborts the session.
pub struct ProgressiveParser<E: Engine> {
    config: E::Config,
    session: Option<E>,
}

impl<E: Engine> ProgressiveParser<E> {
    /// Create a parser with the given configuration.
    pub fn new(config: E::Config) -> Self {
        Self {
            config,
            session: None,
        }
    }

    /// The parser configuration.
    pub fn config(&self) -> &E::Config {
        &self.config
    }

    /// Whether a session is open.
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// The open session, for reading what has been parsed so far.
    pub fn session(&self) -> Option<&E> {
        self.session.as_ref()
    }

    /// Feed a chunk.
    ///
    /// `options` is only read when this push opens a new session.
    pub fn push(&mut self, chunk: impl AsRef<[u8]>, options: &ParseOptions) -> Result<()> {
        let chunk = chunk.as_ref();
        let config = &self.config;
        let session = self.session.get_or_insert_with(|| {
            debug!(base_url = %options.base_url, "progressive session started");
            E::start(config.clone(), options)
        });
        if let Err(e) = session.feed(chunk) {
            debug!(error = %e, "progressive session aborted");
            self.session = None;
            return Err(e);
        }
        Ok(())
    }

    /// Finalize the open session and return its model.
    ///
    /// Without a prior push this returns the model of an empty document.
    pub fn done(&mut self, options: &ParseOptions) -> Result<E::Output> {
        let mut session = match self.session.take() {
            Some(session) => session,
            None => E::start(self.config.clone(), options),
        };
        session.feed(b"\n")?;
        let output = session.finish()?;
        debug!("progressive session finished");
        Ok(output)
    }

    /// Drop the open session without finalizing it.
    pub fn reset(&mut self) {
        self.session = None;
    }
}

impl<E: Engine> Default for ProgressiveParser<E>
where
    E::Config: Default,
{
    fn default() -> Self {
        Self::new(E::Config::default())
    }
}
