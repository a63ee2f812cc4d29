//! Reassembly of newline-terminated lines from an arbitrarily chunked
//! byte stream.

/// Longest unterminated line kept before the buffer gives up on it (64 KiB).
pub const MAX_LINE_LEN: usize = 64 * 1024;

#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
    /// Set while skipping the rest of an overlong line.
    discarding: bool,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and collect every line it completes. Line terminators
    /// (`\n` or `\r\n`) are stripped and blank lines skipped.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        for &byte in chunk {
            if byte == b'\n' {
                if self.discarding {
                    self.discarding = false;
                } else if let Some(line) = self.take_line() {
                    lines.push(line);
                }
                continue;
            }
            if self.discarding {
                continue;
            }
            if self.pending.len() >= MAX_LINE_LEN {
                log::warn!("engine line exceeds {} bytes, discarding it", MAX_LINE_LEN);
                self.pending.clear();
                self.discarding = true;
                continue;
            }
            self.pending.push(byte);
        }
        lines
    }

    /// Flush a trailing line left without a terminator at end of stream.
    pub fn finish(&mut self) -> Option<String> {
        let discarding = std::mem::take(&mut self.discarding);
        if discarding {
            self.pending.clear();
            return None;
        }
        self.take_line()
    }

    /// Bytes held for the current incomplete line.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn take_line(&mut self) -> Option<String> {
        let mut raw = std::mem::take(&mut self.pending);
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }
        let line = String::from_utf8_lossy(&raw).trim().to_string();
        if line.is_empty() {
            None
        } else {
            Some(line)
        }
    }
}
