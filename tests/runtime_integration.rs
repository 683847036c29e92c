use std::sync::{Arc, Mutex};
use std::time::Duration;

use slide_carousel::carousel::Carousel;
use slide_carousel::config::CarouselSettings;
use slide_carousel::deck::{Slide, SlideDeck};
use slide_carousel::events::{Command, Input, TimerKind};
use slide_carousel::schedule::Scheduler;
use slide_carousel::surface::{Controls, Surface, Viewport};
use slide_carousel::tasks::{input, runtime, timers::TokioScheduler};
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

#[derive(Clone, Default)]
struct Offsets(Arc<Mutex<Vec<i64>>>);

impl Offsets {
    fn get(&self) -> Vec<i64> {
        self.0.lock().unwrap().clone()
    }
}

impl Viewport for Offsets {
    fn translate(&mut self, percent: i64) {
        self.0.lock().unwrap().push(percent);
    }
}

fn start(
    slides: usize,
    interval: Duration,
) -> (
    Offsets,
    mpsc::Sender<Command>,
    CancellationToken,
    tokio::task::JoinHandle<anyhow::Result<()>>,
) {
    let deck = SlideDeck::from_vec((0..slides).map(|i| Slide::new(format!("s{i}"))).collect())
        .unwrap();
    let offsets = Offsets::default();
    let surface = Surface::new(offsets.clone()).with_controls(Controls::ALL);
    let cancel = CancellationToken::new();
    let (scheduler, timer_rx) = TokioScheduler::new(cancel.child_token(), 8);
    let settings = CarouselSettings {
        autoplay_interval: interval,
        ..CarouselSettings::default()
    };
    let carousel = Carousel::new(deck, surface, scheduler, settings);
    let (cmd_tx, cmd_rx) = mpsc::channel(8);
    let handle = tokio::spawn(runtime::run(carousel, timer_rx, cmd_rx, cancel.clone()));
    (offsets, cmd_tx, cancel, handle)
}

#[tokio::test(start_paused = true)]
async fn auto_play_advances_on_the_interval() {
    let (offsets, _cmd_tx, cancel, handle) = start(5, Duration::from_secs(3));

    sleep(Duration::from_millis(9_500)).await;
    assert_eq!(offsets.get(), vec![0, -100, -200, -300]);

    cancel.cancel();
    handle.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn manual_input_restarts_the_countdown() {
    let (offsets, cmd_tx, cancel, handle) = start(5, Duration::from_secs(3));

    sleep(Duration::from_millis(3_500)).await;
    cmd_tx.send(Command::Input(Input::NextButton)).await.unwrap();
    sleep(Duration::from_millis(2_900)).await;
    assert_eq!(offsets.get(), vec![0, -100, -200], "old deadline at 6s was dropped");

    sleep(Duration::from_millis(200)).await;
    assert_eq!(offsets.get(), vec![0, -100, -200, -300]);

    cancel.cancel();
    handle.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn quit_and_closed_input_stop_the_loop() {
    let (offsets, cmd_tx, _cancel, handle) = start(3, Duration::from_secs(7));
    cmd_tx.send(Command::Input(Input::PrevButton)).await.unwrap();
    cmd_tx.send(Command::Quit).await.unwrap();
    handle.await.unwrap().unwrap();
    assert_eq!(offsets.get(), vec![0, -200]);

    let (_, cmd_tx, _cancel, handle) = start(3, Duration::from_secs(7));
    drop(cmd_tx);
    handle.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn out_of_range_open_is_reported_not_fatal() {
    let (offsets, cmd_tx, cancel, handle) = start(2, Duration::from_secs(7));
    cmd_tx.send(Command::Open(9)).await.unwrap();
    cmd_tx.send(Command::Input(Input::NextButton)).await.unwrap();
    sleep(Duration::from_millis(10)).await;
    assert_eq!(offsets.get(), vec![0, -100]);
    cancel.cancel();
    handle.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn tokio_scheduler_cancel_stops_a_repeating_timer() {
    let cancel = CancellationToken::new();
    let (mut scheduler, mut rx) = TokioScheduler::new(cancel.clone(), 4);

    let handle = scheduler.repeat(TimerKind::AutoAdvance, Duration::from_millis(100));
    let fired = rx.recv().await.unwrap();
    assert_eq!(fired.handle, handle);
    assert_eq!(fired.kind, TimerKind::AutoAdvance);

    scheduler.cancel(handle);
    scheduler.cancel(handle);
    assert_eq!(scheduler.active_count(), 0);
    sleep(Duration::from_secs(1)).await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn tokio_scheduler_once_fires_after_delay() {
    let cancel = CancellationToken::new();
    let (mut scheduler, mut rx) = TokioScheduler::new(cancel.clone(), 4);
    let start = tokio::time::Instant::now();
    let handle = scheduler.once(TimerKind::HideOverlay, Duration::from_millis(300));
    let fired = rx.recv().await.unwrap();
    assert_eq!(fired.handle, handle);
    assert!(start.elapsed() >= Duration::from_millis(300));

    let skipped = scheduler.once(TimerKind::FadeIn, Duration::from_millis(10));
    cancel.cancel();
    sleep(Duration::from_millis(50)).await;
    assert!(rx.try_recv().is_err(), "root cancellation stops {skipped:?}");
}

#[tokio::test(start_paused = true)]
async fn tokio_scheduler_survives_a_zero_period() {
    let cancel = CancellationToken::new();
    let (mut scheduler, mut rx) = TokioScheduler::new(cancel.clone(), 4);
    let handle = scheduler.repeat(TimerKind::AutoAdvance, Duration::ZERO);
    for _ in 0..3 {
        let fired = rx.recv().await.unwrap();
        assert_eq!(fired.handle, handle);
    }
    scheduler.cancel(handle);
}

#[tokio::test]
async fn input_reader_parses_lines_and_skips_garbage() {
    let script: &[u8] = b"next\nbogus line\n\n  swipe 300 100  \nopen 2\nquit\n";
    let (tx, mut rx) = mpsc::channel(8);
    input::run(script, tx, CancellationToken::new()).await.unwrap();

    let mut got = Vec::new();
    while let Some(cmd) = rx.recv().await {
        got.push(cmd);
    }
    assert_eq!(
        got,
        vec![
            Command::Input(Input::NextButton),
            Command::Swipe { start: 300, end: 100 },
            Command::Open(2),
            Command::Quit,
        ]
    );
}
