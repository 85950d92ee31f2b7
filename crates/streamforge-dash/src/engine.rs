//! The DASH parse session.

use crate::elements::{self, ElementContext, ElementProcessor};
use crate::lexer::{ElementToken, Scanner, XmlEvent};
use crate::model::ParsedManifest;
use crate::state::SharedState;
use crate::DashParserConfig;
use streamforge_common::attributes::check_required;
use streamforge_common::{DebugEvent, Diagnostic, Engine, ParseOptions, Result};
use tracing::debug;

/// An element whose closing tag is pending.
#[derive(Debug)]
struct OpenElement {
    name: String,
    /// `None` for elements handled by a custom handler.
    processor: Option<&'static ElementProcessor>,
}

/// One DASH parse session: scanner cursor, open elements, shared state and
/// the manifest being built.
#[derive(Debug)]
pub struct ManifestSession {
    config: DashParserConfig,
    scanner: Scanner,
    state: SharedState,
    manifest: ParsedManifest,
    open: Vec<OpenElement>,
    /// Depth inside a skipped element; its whole subtree is dropped.
    skipped_depth: usize,
}

impl ManifestSession {
    /// The manifest as built so far. Periods appear once closed.
    pub fn manifest(&self) -> &ParsedManifest {
        &self.manifest
    }

    /// The session's shared state.
    pub fn state(&self) -> &SharedState {
        &self.state
    }

    fn context<'a>(&'a mut self, element: &'a str) -> ElementContext<'a> {
        ElementContext {
            config: &self.config,
            state: &mut self.state,
            manifest: &mut self.manifest,
            element,
        }
    }

    fn dispatch(&mut self, event: XmlEvent) -> Result<()> {
        match event {
            XmlEvent::Open(token) => self.handle_open(token),
            XmlEvent::Close(name) => {
                self.config.debug(&DebugEvent::Close { key: &name });
                self.handle_close(&name);
                Ok(())
            }
            XmlEvent::Text(content) => {
                self.config.debug(&DebugEvent::Content(&content));
                self.handle_text(&content);
                Ok(())
            }
        }
    }

    /// Ignore set, transform hooks, built-in registry, custom handlers, in
    /// that order.
    fn handle_open(&mut self, token: ElementToken) -> Result<()> {
        let name = token.name.as_str();
        self.config.debug(&DebugEvent::Tag {
            key: name,
            value: None,
            attributes: Some(&token.attributes),
        });

        if self.skipped_depth > 0 {
            if !token.self_closing {
                self.skipped_depth += 1;
            }
            return Ok(());
        }

        let Some(prepared) = self
            .config
            .prepare_tag(name, None, Some(&token.attributes))?
        else {
            self.skip(&token);
            return Ok(());
        };
        let attributes = prepared.attributes.unwrap_or_default();

        if let Some(processor) = elements::lookup(name) {
            let accepted = check_required(name, &attributes, processor.required, |d| {
                self.config.warn(d)
            }) && (processor.open)(&mut self.context(name), &attributes);
            if !accepted {
                self.skip(&token);
                return Ok(());
            }
            self.open.push(OpenElement {
                name: token.name.clone(),
                processor: Some(processor),
            });
        } else if self.config.run_custom_tag(
            name,
            None,
            Some(&attributes),
            &mut self.manifest.custom,
            &self.state,
        )? {
            self.open.push(OpenElement {
                name: token.name.clone(),
                processor: None,
            });
        } else {
            self.config.warn(Diagnostic::UnsupportedTag {
                tag: name.to_string(),
            });
            self.skip(&token);
            return Ok(());
        }

        if token.self_closing {
            self.handle_close(&token.name);
        }
        Ok(())
    }

    fn skip(&mut self, token: &ElementToken) {
        if !token.self_closing {
            self.skipped_depth = 1;
        }
    }

    fn handle_close(&mut self, name: &str) {
        if self.skipped_depth > 0 {
            self.skipped_depth -= 1;
            return;
        }
        let Some(position) = self.open.iter().rposition(|e| e.name == name) else {
            self.config.warn(Diagnostic::Advisory {
                tag: name.to_string(),
                message: "closing tag without a matching opening tag".to_string(),
            });
            return;
        };
        while self.open.len() > position {
            if let Some(element) = self.open.pop() {
                if element.name != name {
                    self.config.warn(Diagnostic::Advisory {
                        tag: element.name.clone(),
                        message: format!("implicitly closed by </{name}>"),
                    });
                }
                self.close_element(element);
            }
        }
    }

    fn close_element(&mut self, element: OpenElement) {
        if let Some(close) = element.processor.and_then(|p| p.close) {
            close(&mut self.context(&element.name));
        }
    }

    fn handle_text(&mut self, content: &str) {
        if self.skipped_depth > 0 {
            return;
        }
        let Some(element) = self.open.last() else {
            return;
        };
        let Some(text) = element.processor.and_then(|p| p.text) else {
            return;
        };
        let name = element.name.clone();
        text(&mut self.context(&name), content);
    }
}

impl Engine for ManifestSession {
    type Config = DashParserConfig;
    type Output = ParsedManifest;

    fn start(config: DashParserConfig, options: &ParseOptions) -> Self {
        Self {
            config,
            scanner: Scanner::new(),
            state: SharedState::new(options),
            manifest: ParsedManifest::default(),
            open: Vec::new(),
            skipped_depth: 0,
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

    /// Elements still open at the end of input are closed innermost first.
    fn finish(mut self) -> Result<ParsedManifest> {
        if !self.open.is_empty() {
            debug!(open = self.open.len(), "closing unterminated elements");
        }
        while let Some(element) = self.open.pop() {
            self.close_element(element);
        }
        debug!(
            periods = self.manifest.periods.len(),
            representations = self.manifest.representations().count(),
            "manifest finalized"
        );
        Ok(self.manifest)
    }
}
