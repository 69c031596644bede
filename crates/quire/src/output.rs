//! Terminal output: command results on stdout, colored messages on stderr.

use console::{Style, Term};

/// Terminal output formatter.
pub(crate) struct Output {
    stdout: Term,
    stderr: Term,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            stdout: Term::stdout(),
            stderr: Term::stderr(),
        }
    }

    /// Write a command result line to stdout.
    pub(crate) fn data(&self, text: &str) -> std::io::Result<()> {
        self.stdout.write_line(text)
    }

    pub(crate) fn info(&self, msg: &str) {
        self.message(&Style::new(), msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        self.message(&Style::new().green(), msg);
    }

    pub(crate) fn warning(&self, msg: &str) {
        self.message(&Style::new().yellow(), msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.message(&Style::new().red().bold(), msg);
    }

    /// Diagnostics are best effort; a closed stderr is ignored.
    fn message(&self, style: &Style, msg: &str) {
        let _ = self.stderr.write_line(&style.apply_to(msg).to_string());
    }
}
