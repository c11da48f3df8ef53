use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

/// One formatted subscriber line, with the level read back from its prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub level: Option<Level>,
    pub text: String,
}

impl LogLine {
    pub fn parse(text: impl Into<String>) -> Self {
        let text = text.into();
        // `fmt` output is `<timestamp> <LEVEL> <target>: ...`.
        let level = text
            .split_whitespace()
            .take(2)
            .find_map(|token| token.parse::<Level>().ok());
        Self { level, text }
    }

    pub fn is_warning(&self) -> bool {
        matches!(self.level, Some(Level::WARN) | Some(Level::ERROR))
    }
}

/// Bounded in-memory sink for the log pane.
///
/// Warnings are counted over the whole session, including lines that have
/// already been evicted.
pub struct LogStore {
    lines: VecDeque<LogLine>,
    max_lines: usize,
    warnings: usize,
}

impl LogStore {
    pub fn new(max_lines: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            max_lines: max_lines.max(1),
            warnings: 0,
        }
    }

    pub fn push_line(&mut self, line: impl Into<String>) {
        let line = line.into();
        if line.trim().is_empty() {
            return;
        }
        let line = LogLine::parse(line);
        if line.is_warning() {
            self.warnings += 1;
        }
        self.lines.push_back(line);
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn warnings(&self) -> usize {
        self.warnings
    }

    /// Last `n` lines, oldest first.
    pub fn tail(&self, n: usize) -> Vec<LogLine> {
        let skip = self.lines.len().saturating_sub(n);
        self.lines.iter().skip(skip).cloned().collect()
    }
}

pub type SharedLogStore = Arc<Mutex<LogStore>>;

/// Routes subscriber output into a [`LogStore`] so it never reaches the
/// terminal the TUI is drawing on.
#[derive(Clone)]
pub struct LogMakeWriter {
    store: SharedLogStore,
}

impl LogMakeWriter {
    pub fn new(store: SharedLogStore) -> Self {
        Self { store }
    }
}

impl<'a> MakeWriter<'a> for LogMakeWriter {
    type Writer = LogLineWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogLineWriter {
            store: self.store.clone(),
            pending: Vec::new(),
        }
    }
}

/// Buffers raw bytes and commits whole lines; multi-byte characters split
/// across writes are reassembled before decoding.
pub struct LogLineWriter {
    store: SharedLogStore,
    pending: Vec<u8>,
}

impl LogLineWriter {
    fn commit(&self, raw: &[u8]) {
        let text = String::from_utf8_lossy(raw);
        self.store.lock().push_line(text.trim_end_matches('\r'));
    }
}

impl Write for LogLineWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        while let Some(idx) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=idx).collect();
            self.commit(&line[..idx]);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for LogLineWriter {
    fn drop(&mut self) {
        if !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            self.commit(&rest);
        }
    }
}
