use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;
use visionary_llm::{Renderer, StreamState};

/// Prints a panel's growing text to a terminal
///
/// Every state carries the full text so far; only the part not yet
/// printed is written.
pub struct DeltaPrinter<W: Write> {
    out: W,
    printed: usize,
}

impl<W: Write> DeltaPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out, printed: 0 }
    }

    pub fn render(&mut self, state: &StreamState) -> io::Result<()> {
        if state.failed {
            if self.printed > 0 {
                writeln!(self.out)?;
            }
            writeln!(self.out, "{}", state.text)?;
            self.printed = 0;
            return self.out.flush();
        }

        // A shorter text means a new request took over the panel
        if state.text.len() < self.printed || !state.text.is_char_boundary(self.printed) {
            self.printed = 0;
        }

        self.out.write_all(state.text[self.printed..].as_bytes())?;
        self.printed = state.text.len();

        if !state.loading && !state.text.is_empty() {
            writeln!(self.out)?;
            self.printed = 0;
        }
        self.out.flush()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Renderer writing every panel update to stdout
pub fn stdout_renderer() -> Renderer {
    let printer = Mutex::new(DeltaPrinter::new(io::stdout()));
    Arc::new(move |state: &StreamState| {
        if let Err(e) = printer.lock().render(state) {
            tracing::warn!("Failed to write analysis output: {}", e);
        }
    })
}
