use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::select;
use tokio::sync::mpsc::Sender;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::events::Command;

/// Read line commands from `reader` and forward them to the carousel.
///
/// Blank lines are skipped and malformed lines are logged and dropped. The
/// task ends on end of input, when the carousel side hangs up, or on
/// cancellation; dropping the sender tells the runtime that input is gone.
pub async fn run<R>(reader: R, to_carousel: Sender<Command>, cancel: CancellationToken) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        let line = select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => line.context("failed to read control input")?,
        };
        let Some(line) = line else {
            info!("control input closed");
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.parse::<Command>() {
            Ok(command) => {
                debug!(?command, "command");
                if to_carousel.send(command).await.is_err() {
                    break;
                }
            }
            Err(err) => warn!(line, "ignoring input: {err}"),
        }
    }
    Ok(())
}
