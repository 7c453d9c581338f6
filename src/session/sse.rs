//! Incremental `text/event-stream` parser.
//!
//! Bytes are fed as they arrive from the network. Lines may be split across
//! chunks at any byte (including inside a UTF-8 sequence); only complete lines
//! are decoded. Field handling follows the browser `EventSource` rules: the last
//! event id persists across events until the server sends a new `id:` field, and
//! an event without `data:` lines is never dispatched. A leading UTF-8 byte
//! order mark is dropped before the first line.

/// One dispatched server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    /// Event type (`message` when the server sent no `event:` field).
    pub event: String,
    /// Last event id seen on this connection.
    pub id: Option<String>,
    /// `data:` lines joined with `\n`.
    pub data: String,
}

#[derive(Debug, Default)]
pub struct SseParser {
    buf: Vec<u8>,
    /// Bytes of `buf` before this offset hold no line terminator.
    scan_from: usize,
    bom_checked: bool,
    event: Option<String>,
    data: Vec<String>,
    last_id: Option<String>,
}

const DEFAULT_EVENT: &str = "message";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a chunk and returns every frame completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buf.extend_from_slice(chunk);

        if !self.bom_checked {
            // Wait until there are enough bytes to tell a split BOM apart.
            if self.buf.len() < UTF8_BOM.len() && UTF8_BOM.starts_with(&self.buf) {
                return Vec::new();
            }
            if self.buf.starts_with(UTF8_BOM) {
                self.buf.drain(..UTF8_BOM.len());
            }
            self.bom_checked = true;
        }

        let mut lines = Vec::new();
        let mut start = 0;
        let mut i = self.scan_from;
        while i < self.buf.len() {
            match self.buf[i] {
                b'\n' => {
                    lines.push(String::from_utf8_lossy(&self.buf[start..i]).into_owned());
                    i += 1;
                    start = i;
                }
                b'\r' => {
                    // A trailing CR may be the first half of CRLF.
                    if i + 1 == self.buf.len() {
                        break;
                    }
                    lines.push(String::from_utf8_lossy(&self.buf[start..i]).into_owned());
                    i += if self.buf[i + 1] == b'\n' { 2 } else { 1 };
                    start = i;
                }
                _ => i += 1,
            }
        }
        self.buf.drain(..start);
        self.scan_from = i - start;

        lines
            .into_iter()
            .filter_map(|line| self.process_line(&line))
            .collect()
    }

    fn process_line(&mut self, line: &str) -> Option<SseFrame> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            "id" if !value.contains('\0') => {
                self.last_id = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        let event = self.event.take();
        if self.data.is_empty() {
            return None;
        }
        let data = std::mem::take(&mut self.data).join("\n");
        Some(SseFrame {
            event: event
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| DEFAULT_EVENT.to_string()),
            id: self.last_id.clone(),
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_event() {
        let mut parser = SseParser::new();
        let frames = parser.push(b"event: fetching_data\nid: s1\ndata: {\"a\":1}\n\n");
        assert_eq!(
            frames,
            vec![SseFrame {
                event: "fetching_data".into(),
                id: Some("s1".into()),
                data: "{\"a\":1}".into(),
            }]
        );
    }

    #[test]
    fn test_event_split_across_chunks() {
        let mut parser = SseParser::new();
        assert!(parser.push(b"event: fetch").is_empty());
        assert!(parser.push(b"ing_error\nid: s").is_empty());
        assert!(parser.push(b"2\ndata: [{\"kind\":").is_empty());
        let frames = parser.push(b"\"TIMEOUT\"}]\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].event, "fetching_error");
        assert_eq!(frames[0].id.as_deref(), Some("s2"));
        assert_eq!(frames[0].data, "[{\"kind\":\"TIMEOUT\"}]");
    }

    #[test]
    fn test_utf8_split_inside_character() {
        let mut parser = SseParser::new();
        let bytes = "data: café\n\n".as_bytes();
        // Split in the middle of the two-byte 'é'.
        let split = bytes.len() - 3;
        assert!(parser.push(&bytes[..split]).is_empty());
        let frames = parser.push(&bytes[split..]);
        assert_eq!(frames[0].data, "café");
    }

    #[test]
    fn test_crlf_and_cr_line_endings() {
        let mut parser = SseParser::new();
        let frames = parser.push(b"event: a\r\ndata: 1\r\n\r\nevent: b\rdata: 2\r\r\n");
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].event, "a");
        assert_eq!(frames[1].event, "b");
        assert_eq!(frames[1].data, "2");
    }

    #[test]
    fn test_crlf_split_between_chunks() {
        let mut parser = SseParser::new();
        assert!(parser.push(b"data: x\r").is_empty());
        assert!(parser.push(b"\n\r").is_empty());
        let frames = parser.push(b"\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, "x");
    }

    #[test]
    fn test_multiline_data_and_comments() {
        let mut parser = SseParser::new();
        let frames = parser.push(b": keep-alive\ndata: line1\ndata:line2\nretry: 1000\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].event, "message");
        assert_eq!(frames[0].data, "line1\nline2");
    }

    #[test]
    fn test_event_without_data_is_dropped() {
        let mut parser = SseParser::new();
        let frames = parser.push(b"event: ping\n\ndata: x\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].event, "message");
    }

    #[test]
    fn test_last_event_id_persists() {
        let mut parser = SseParser::new();
        let frames = parser.push(b"id: r1\ndata: a\n\ndata: b\n\nid\ndata: c\n\n");
        assert_eq!(frames[0].id.as_deref(), Some("r1"));
        assert_eq!(frames[1].id.as_deref(), Some("r1"));
        assert_eq!(frames[2].id, None);
    }

    #[test]
    fn test_large_line_in_small_chunks_scans_each_byte_once() {
        let payload = format!("[\"{}\"]", "x".repeat(4 * 1024 * 1024));
        let body = format!("event: fetching_data\nid: s1\ndata: {}\n\n", payload);
        let mut parser = SseParser::new();
        let mut frames = Vec::new();
        for chunk in body.as_bytes().chunks(8 * 1024) {
            frames.extend(parser.push(chunk));
            // Everything buffered so far has been scanned; the next push resumes here.
            assert_eq!(parser.scan_from, parser.buf.len());
        }
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data.len(), payload.len());
        assert!(parser.buf.is_empty());
    }

    #[test]
    fn test_scan_resumes_at_trailing_cr() {
        let mut parser = SseParser::new();
        assert!(parser.push(b"data: abc\r").is_empty());
        assert_eq!(parser.scan_from, parser.buf.len() - 1);
        let frames = parser.push(b"\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, "abc");
    }

    #[test]
    fn test_leading_bom_is_stripped() {
        let mut parser = SseParser::new();
        let frames = parser.push(b"\xEF\xBB\xBFevent: fetching_start\ndata: {}\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].event, "fetching_start");
    }

    #[test]
    fn test_bom_split_across_chunks_is_stripped() {
        let mut parser = SseParser::new();
        assert!(parser.push(b"\xEF").is_empty());
        assert!(parser.push(b"\xBB").is_empty());
        let frames = parser.push(b"\xBFevent: fetching_start\ndata: {}\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].event, "fetching_start");
    }

    #[test]
    fn test_bom_only_stripped_at_stream_start() {
        let mut parser = SseParser::new();
        let frames = parser.push(b"data: a\n\n\xEF\xBB\xBFevent: x\ndata: b\n\n");
        assert_eq!(frames.len(), 2);
        // Mid-stream, the BOM is part of the field name, so `event` is ignored.
        assert_eq!(frames[1].event, "message");
    }

    #[test]
    fn test_incomplete_event_not_dispatched() {
        let mut parser = SseParser::new();
        assert!(parser.push(b"event: fetching_data\ndata: {}\n").is_empty());
    }
}
