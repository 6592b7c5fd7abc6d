// ─── Server Output ───
// Combined stdout/stderr of the server, delivered one line at a time.

use std::io::{BufRead, BufReader as StdBufReader, ErrorKind, PipeReader};
use std::process::ExitStatus;

use futures_util::stream::{self, Stream};
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

/// Lines buffered between the pipe reader and the consumer. Once full the
/// reader stops draining the pipe and the child blocks on write.
pub(crate) const OUTPUT_BUFFER_LINES: usize = 256;

/// How the supervised process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessExit {
    Exited(ExitStatus),
    /// The exit status could not be collected.
    Lost,
}

/// Line stream of a single launch. Finite and not restartable: it ends
/// once the output is drained and the process has exited.
pub struct ServerOutput {
    lines: mpsc::Receiver<String>,
    exit: watch::Receiver<Option<ProcessExit>>,
}

impl ServerOutput {
    pub(crate) fn new(
        lines: mpsc::Receiver<String>,
        exit: watch::Receiver<Option<ProcessExit>>,
    ) -> Self {
        Self { lines, exit }
    }

    /// Next line written by the server, in write order, without the line
    /// terminator. `None` once the process exited and nothing is left.
    pub async fn next_line(&mut self) -> Option<String> {
        if let Some(line) = self.lines.recv().await {
            return Some(line);
        }

        // Pipe closed; the exit status follows shortly after.
        if self.exit.wait_for(|exit| exit.is_some()).await.is_err() {
            debug!("Exit watcher dropped before publishing a status");
        }
        None
    }

    /// Exit of the process, if it has been observed yet.
    pub fn exit(&self) -> Option<ProcessExit> {
        *self.exit.borrow()
    }

    pub fn into_stream(self) -> impl Stream<Item = String> {
        stream::unfold(self, |mut output| async move {
            output.next_line().await.map(|line| (line, output))
        })
    }
}

/// Blocking loop: split the pipe into lines and hand them to the channel.
/// Returns when the pipe reaches EOF or the consumer is gone.
pub(crate) fn relay_lines(pipe: PipeReader, lines: mpsc::Sender<String>) {
    let mut reader = StdBufReader::new(pipe);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                if lines.blocking_send(decode_line(&buf)).is_err() {
                    debug!("Output consumer dropped; no longer relaying server output");
                    break;
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!("Reading server output failed: {}", e);
                break;
            }
        }
    }
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
