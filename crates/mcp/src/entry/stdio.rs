#![forbid(unsafe_code)]

use super::framing::Framing;
use crate::{McpServer, parse_request};
use std::io::{BufRead, Write};

/// Serves requests until the reader hits EOF.
pub(crate) fn run_stdio<R: BufRead, W: Write>(
    server: &mut McpServer,
    reader: &mut R,
    writer: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut framing: Option<Framing> = None;

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            break;
        }

        let current = match framing {
            Some(current) => current,
            None => {
                let Some(detected) = Framing::detect(&line) else {
                    continue;
                };
                tracing::debug!(framing = ?detected, "stdio framing detected");
                framing = Some(detected);
                detected
            }
        };

        let Some(body) = current.read_body(reader, line)? else {
            continue;
        };
        let response = match parse_request(&body) {
            Ok(request) => server.handle(request),
            Err(error) => Some(error),
        };
        if let Some(response) = response {
            current.write(writer, &response)?;
        }
    }

    tracing::debug!("stdin closed");
    Ok(())
}
