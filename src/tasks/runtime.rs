use std::ops::ControlFlow;

use anyhow::Result;
use tokio::select;
use tokio::sync::mpsc::Receiver;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::carousel::Carousel;
use crate::events::{Command, TimerFired};
use crate::tasks::timers::TokioScheduler;

/// Drive a carousel from timer expiries and input commands.
///
/// The carousel is only touched from this loop, one event at a time. The
/// loop stops on cancellation, on `quit`, or once the command channel closes;
/// all carousel timers are cancelled on the way out.
pub async fn run(
    mut carousel: Carousel<TokioScheduler>,
    mut timers: Receiver<TimerFired>,
    mut commands: Receiver<Command>,
    cancel: CancellationToken,
) -> Result<()> {
    carousel.init();

    loop {
        select! {
            _ = cancel.cancelled() => {
                info!("shutdown requested");
                break;
            }

            Some(fired) = timers.recv() => carousel.on_timer(fired),

            maybe_cmd = commands.recv() => {
                let Some(command) = maybe_cmd else {
                    info!("input closed; stopping carousel");
                    break;
                };
                match carousel.apply(command) {
                    Ok(ControlFlow::Continue(())) => {}
                    Ok(ControlFlow::Break(())) => {
                        info!("quit requested");
                        break;
                    }
                    Err(err) => warn!("{err}"),
                }
            }
        }
    }

    carousel.shutdown();
    info!(slide = carousel.index() + 1, "carousel stopped");
    Ok(())
}
