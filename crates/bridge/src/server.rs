#![forbid(unsafe_code)]

use crate::backend::{Backend, encode_response};
use crate::protocol::{Outcome, RemoteError, ResponseFrame};
use std::io::{BufRead, BufReader, Write};
use tracing::{info, warn};

/// Serves newline-delimited JSON frames until the reader hits EOF.
/// Returns the number of frames answered.
pub fn serve<R: BufRead, W: Write>(
    backend: &mut Backend,
    mut reader: R,
    writer: &mut W,
) -> std::io::Result<u64> {
    let mut handled = 0u64;
    let mut line = Vec::new();

    loop {
        line.clear();
        let read = reader.read_until(b'\n', &mut line)?;
        if read == 0 {
            break;
        }

        let response = match std::str::from_utf8(&line) {
            Ok(text) => {
                let raw = text.trim();
                if raw.is_empty() {
                    continue;
                }
                backend.handle_frame(raw)
            }
            Err(err) => {
                warn!(error = %err, "frame is not valid UTF-8");
                encode_response(&ResponseFrame {
                    id: 0,
                    outcome: Outcome::Err {
                        error: RemoteError::invalid_input(format!("malformed request: {err}")),
                    },
                })
            }
        };
        writeln!(writer, "{response}")?;
        writer.flush()?;
        handled += 1;
    }

    Ok(handled)
}

pub fn run_stdio(backend: &mut Backend) -> std::io::Result<()> {
    let stdin = std::io::stdin();
    let reader = BufReader::new(stdin.lock());
    let mut stdout = std::io::stdout().lock();

    let handled = serve(backend, reader, &mut stdout)?;
    info!(handled, "stdin closed, backend stopping");
    Ok(())
}
