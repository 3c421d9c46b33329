//! Incremental parser for `text/event-stream` bodies

/// One parsed server-sent event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// `event:` field, when present
    pub event: Option<String>,
    /// Joined `data:` payload
    pub data: String,
}

/// Buffering SSE parser: feed raw body chunks, collect completed events.
///
/// Events may be split across chunk boundaries, so lines are only consumed
/// once their terminator has arrived. Multi-line `data:` fields are joined
/// with newlines, comment lines are skipped, CRLF line endings are accepted.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: String,
    event: Option<String>,
    data: Vec<String>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk; returns every event the chunk completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=pos).collect();
            let line = line.trim_end_matches(['\r', '\n']);

            if line.is_empty() {
                // Blank line dispatches the pending event, if it has data.
                if self.data.is_empty() {
                    self.event = None;
                } else {
                    events.push(SseEvent {
                        event: self.event.take(),
                        data: self.data.join("\n"),
                    });
                    self.data.clear();
                }
                continue;
            }

            if line.starts_with(':') {
                continue; // comment / keep-alive
            }

            let (field, value) = match line.split_once(':') {
                Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
                None => (line, ""),
            };
            match field {
                "event" => self.event = Some(value.to_string()),
                "data" => self.data.push(value.to_string()),
                _ => {} // id and retry are irrelevant here
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_event() {
        let mut parser = SseParser::new();
        let events = parser.push(b"data: {\"status\":\"ok\"}\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, r#"{"status":"ok"}"#);
        assert!(events[0].event.is_none());
    }

    #[test]
    fn event_split_across_chunks() {
        let mut parser = SseParser::new();
        assert!(parser.push(b"data: {\"sta").is_empty());
        assert!(parser.push(b"tus\":\"ok\"}").is_empty());
        let events = parser.push(b"\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, r#"{"status":"ok"}"#);
    }

    #[test]
    fn multi_line_data_joined_with_newlines() {
        let mut parser = SseParser::new();
        let events = parser.push(b"data: first\ndata: second\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "first\nsecond");
    }

    #[test]
    fn named_event_captured() {
        let mut parser = SseParser::new();
        let events = parser.push(b"event: result\ndata: done\n\n");
        assert_eq!(events[0].event.as_deref(), Some("result"));
        assert_eq!(events[0].data, "done");
    }

    #[test]
    fn comments_and_unknown_fields_ignored() {
        let mut parser = SseParser::new();
        let events = parser.push(b": keep-alive\nid: 7\nretry: 1000\ndata: x\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "x");
    }

    #[test]
    fn crlf_line_endings_accepted() {
        let mut parser = SseParser::new();
        let events = parser.push(b"data: hello\r\n\r\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "hello");
    }

    #[test]
    fn blank_line_without_data_dispatches_nothing() {
        let mut parser = SseParser::new();
        assert!(parser.push(b"\n\n: ping\n\n").is_empty());
    }

    #[test]
    fn incomplete_event_stays_buffered() {
        let mut parser = SseParser::new();
        assert!(parser.push(b"data: pending").is_empty());
        assert!(parser.push(b"\n").is_empty());
        // no blank line yet, nothing dispatched
        let events = parser.push(b"\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "pending");
    }

    #[test]
    fn two_events_in_one_chunk() {
        let mut parser = SseParser::new();
        let events = parser.push(b"data: a\n\ndata: b\n\n");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].data, "a");
        assert_eq!(events[1].data, "b");
    }
}
