#![forbid(unsafe_code)]

use serde_json::Value;
use std::io::{self, BufRead, Write};

const MAX_FRAME_BYTES: usize = 16 * 1024 * 1024;

/// How messages are delimited on stdio. Chosen once from the first non-blank
/// line and kept for the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Framing {
    /// One JSON message per line.
    Lines,
    /// `Content-Length: N` header block, blank line, N bytes of body.
    Headers,
}

impl Framing {
    pub(crate) fn detect(line: &str) -> Option<Self> {
        let trimmed = line.trim_start();
        if trimmed.starts_with('{') || trimmed.starts_with('[') {
            return Some(Self::Lines);
        }
        content_length(trimmed).map(|_| Self::Headers)
    }

    /// Message body starting at `line`, or `None` when there is nothing to
    /// dispatch (a blank line, or EOF inside a header block).
    pub(crate) fn read_body<R: BufRead>(
        self,
        reader: &mut R,
        line: String,
    ) -> io::Result<Option<Vec<u8>>> {
        if line.trim().is_empty() {
            return Ok(None);
        }
        match self {
            Self::Lines => Ok(Some(line.trim().as_bytes().to_vec())),
            Self::Headers => read_header_frame(reader, line),
        }
    }

    pub(crate) fn write<W: Write>(self, writer: &mut W, message: &Value) -> io::Result<()> {
        let body = serde_json::to_vec(message)?;
        match self {
            Self::Lines => {
                writer.write_all(&body)?;
                writer.write_all(b"\n")?;
            }
            Self::Headers => {
                write!(writer, "Content-Length: {}\r\n\r\n", body.len())?;
                writer.write_all(&body)?;
            }
        }
        writer.flush()
    }
}

fn content_length(line: &str) -> Option<usize> {
    let (key, value) = line.trim().split_once(':')?;
    if !key.trim().eq_ignore_ascii_case("content-length") {
        return None;
    }
    value.trim().parse().ok()
}

fn read_header_frame<R: BufRead>(reader: &mut R, first: String) -> io::Result<Option<Vec<u8>>> {
    let mut len = content_length(&first);
    let mut header = first;
    while !header.trim().is_empty() {
        header.clear();
        if reader.read_line(&mut header)? == 0 {
            return Ok(None);
        }
        len = len.or_else(|| content_length(&header));
    }

    let len = len.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "missing Content-Length"))?;
    if len > MAX_FRAME_BYTES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "Content-Length exceeds max allowed size",
        ));
    }
    let mut body = vec![0u8; len];
    reader.read_exact(&mut body)?;
    Ok(Some(body))
}
