//! Output rendering for streamed replies.
//!
//! This module provides the renderer trait the chat client writes to and a
//! plain-text implementation that prints to stdout.

use std::io::{self, Stdout, Write};

/// Trait for rendering streaming output.
///
/// Reply text goes through [`Renderer::print_text`] as it arrives; diagnostics
/// go through [`Renderer::print_error`] and [`Renderer::print_info`] so they
/// can be kept apart from the reply.
pub trait Renderer: Send {
    /// Print a chunk of response text.
    ///
    /// This is called incrementally as fragments are streamed from the API.
    fn print_text(&mut self, text: &str);

    /// Called once the reply is over, however it ended.
    fn finish_response(&mut self);

    /// Print an error message.
    fn print_error(&mut self, error: &str) {
        eprintln!("Error: {error}");
    }

    /// Print an informational message.
    fn print_info(&mut self, info: &str) {
        eprintln!("{info}");
    }
}

/// Plain text renderer.
///
/// Writes reply text without any styling and flushes after every fragment so
/// it shows up as soon as it arrives.
pub struct PlainTextRenderer<W: Write + Send = Stdout> {
    out: W,
}

impl PlainTextRenderer<Stdout> {
    /// Creates a renderer that writes to stdout.
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for PlainTextRenderer<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> PlainTextRenderer<W> {
    /// Creates a renderer that writes to `out`.
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, text: &str) {
        // A closed stdout is not worth aborting the stream for.
        let _ = self.out.write_all(text.as_bytes());
        let _ = self.out.flush();
    }
}

impl<W: Write + Send> Renderer for PlainTextRenderer<W> {
    fn print_text(&mut self, text: &str) {
        self.write(text);
    }

    fn finish_response(&mut self) {
        self.write("\n");
    }
}
