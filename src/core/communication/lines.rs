/// Longest partial line held back before it is emitted without a terminator
pub const MAX_PENDING_LINE: usize = 64 * 1024;

/// Splits an inbound byte stream into text lines.
///
/// Lines end at `\n`. Each line is decoded lossily, so malformed UTF-8 turns
/// into U+FFFD instead of an error, and trailing whitespace (including a
/// `\r` from CRLF devices) is trimmed. Lines that end up empty are dropped.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
    /// How far into `pending` we already know there is no newline
    cursor: usize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes and collect every line they complete
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);

        let mut lines = Vec::new();
        loop {
            let look_at = &self.pending[self.cursor..];
            match look_at.iter().position(|&byte| byte == b'\n') {
                Some(position) => {
                    let end = self.cursor + position;
                    let line: Vec<u8> = self.pending.drain(..=end).collect();
                    self.cursor = 0;

                    if let Some(text) = decode_line(&line[..end]) {
                        lines.push(text);
                    }
                }
                None => {
                    if self.pending.len() >= MAX_PENDING_LINE {
                        let rest = self.pending.split_off(complete_prefix_len(&self.pending));
                        let line = std::mem::replace(&mut self.pending, rest);
                        self.cursor = self.pending.len();

                        if let Some(text) = decode_line(&line) {
                            lines.push(text);
                        }
                    } else {
                        self.cursor = self.pending.len();
                    }
                    break;
                }
            }
        }

        lines
    }

    /// Bytes waiting for a terminator
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Length of `bytes` without a trailing multi-byte character that is still incomplete
fn complete_prefix_len(bytes: &[u8]) -> usize {
    let start = bytes.len().saturating_sub(3);
    let lead = bytes[start..].iter().rposition(|&byte| byte & 0xC0 != 0x80);

    match lead.map(|offset| start + offset) {
        Some(lead) => match std::str::from_utf8(&bytes[lead..]) {
            Err(e) if e.error_len().is_none() => lead,
            _ => bytes.len(),
        },
        None => bytes.len(),
    }
}

/// Decode one line lossily and trim trailing whitespace; `None` if nothing is left
pub fn decode_line(bytes: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(bytes);
    let trimmed = text.trim_end();

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
