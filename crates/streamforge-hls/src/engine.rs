//! The HLS parse session.

use crate::builder;
use crate::lexer::{ScanEvent, Scanner, TagToken};
use crate::model::ParsedPlaylist;
use crate::state::SharedState;
use crate::tags::{self, TagContext};
use crate::HlsParserConfig;
use streamforge_common::{DebugEvent, Diagnostic, Engine, ParseOptions, Result};
use tracing::debug;

/// One HLS parse session: scanner cursor, shared state and the playlist
/// being built.
#[derive(Debug)]
pub struct PlaylistSession {
    config: HlsParserConfig,
    scanner: Scanner,
    state: SharedState,
    playlist: ParsedPlaylist,
}

impl PlaylistSession {
    /// The playlist as built so far.
    ///
    /// Records are only appended, so anything visible here is final except
    /// for program date time back-fill.
    pub fn playlist(&self) -> &ParsedPlaylist {
        &self.playlist
    }

    /// The session's shared state.
    pub fn state(&self) -> &SharedState {
        &self.state
    }

    fn dispatch(&mut self, event: ScanEvent) -> Result<()> {
        match event {
            ScanEvent::Uri(line) => {
                self.config.debug(&DebugEvent::Content(&line));
                builder::handle_uri(&self.config, &mut self.state, &mut self.playlist, &line);
                Ok(())
            }
            ScanEvent::Tag(token) => self.handle_tag(token),
        }
    }

    /// Ignore set, transform hooks, built-in registry, custom handlers, in
    /// that order.
    fn handle_tag(&mut self, token: TagToken) -> Result<()> {
        let key = token.key.as_str();
        self.config.debug(&DebugEvent::Tag {
            key,
            value: token.value.as_deref(),
            attributes: token.attributes.as_ref(),
        });

        let Some(prepared) =
            self.config
                .prepare_tag(key, token.value.as_deref(), token.attributes.as_ref())?
        else {
            return Ok(());
        };

        if let Some(processor) = tags::lookup(key) {
            let mut ctx = TagContext {
                config: &self.config,
                state: &mut self.state,
                playlist: &mut self.playlist,
                tag: key,
            };
            tags::process(
                processor,
                &mut ctx,
                prepared.value.as_deref(),
                prepared.attributes.as_ref(),
            );
            return Ok(());
        }

        let handled = self.config.run_custom_tag(
            key,
            prepared.value.as_deref(),
            prepared.attributes.as_ref(),
            &mut self.playlist.custom,
            &self.state,
        )?;
        if !handled {
            self.config.warn(Diagnostic::UnsupportedTag {
                tag: key.to_string(),
            });
        }
        Ok(())
    }
}

impl Engine for PlaylistSession {
    type Config = HlsParserConfig;
    type Output = ParsedPlaylist;

    fn start(config: HlsParserConfig, options: &ParseOptions) -> Self {
        Self {
            config,
            scanner: Scanner::new(),
            state: SharedState::new(options),
            playlist: ParsedPlaylist::default(),
        }
    }

    fn feed(&mut self, chunk: &[u8]) -> Result<()> {
        for &byte in chunk {
            if let Some(event) = self.scanner.step(byte) {
                self.dispatch(event)?;
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<ParsedPlaylist> {
        builder::finalize(&mut self.playlist);
        debug!(
            segments = self.playlist.segments.len(),
            variants = self.playlist.variant_streams.len(),
            "playlist finalized"
        );
        Ok(self.playlist)
    }
}
