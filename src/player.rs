//! Paced, pausable playback of step sequences.
//!
//! The engine never waits. Everything time related lives here, on the
//! consumer side: a [`Timeline`] for manual scrubbing, and a [`Player`]
//! that reveals steps one at a time on a tokio runtime.

use std::{sync::Arc, time::Duration};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::Step;

/// A step sequence with a cursor, for stepping forwards and backwards by
/// hand.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    steps: Vec<Step>,
    pos: usize,
}

impl Timeline {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps, pos: 0 }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn current(&self) -> Option<&Step> {
        self.steps.get(self.pos)
    }

    /// Moves one step forward. Stays put on the last step.
    pub fn advance(&mut self) -> Option<&Step> {
        if self.pos + 1 < self.steps.len() {
            self.pos += 1;
        }
        self.current()
    }

    /// Moves one step back. Stays put on the first step.
    pub fn back(&mut self) -> Option<&Step> {
        self.pos = self.pos.saturating_sub(1);
        self.current()
    }

    pub fn seek(&mut self, pos: usize) -> Option<&Step> {
        if pos < self.steps.len() {
            self.pos = pos;
        }
        self.current()
    }

    pub fn is_finished(&self) -> bool {
        self.pos + 1 >= self.steps.len()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }
}

#[derive(Debug)]
struct Shared {
    paused: watch::Sender<bool>,
    delay: watch::Sender<Duration>,
    cancel: CancellationToken,
}

/// Controls a [`Player`] from elsewhere, typically another task.
#[derive(Debug, Clone)]
pub struct PlaybackHandle {
    shared: Arc<Shared>,
}

impl PlaybackHandle {
    pub fn pause(&self) {
        self.shared.paused.send_replace(true);
    }

    pub fn resume(&self) {
        self.shared.paused.send_replace(false);
    }

    /// Flips the pause state and returns the new one.
    pub fn toggle_pause(&self) -> bool {
        let mut now = false;
        self.shared.paused.send_modify(|p| {
            *p = !*p;
            now = *p;
        });
        now
    }

    pub fn is_paused(&self) -> bool {
        *self.shared.paused.borrow()
    }

    /// Takes effect from the next pause between steps.
    pub fn set_delay(&self, delay: Duration) {
        self.shared.delay.send_replace(delay);
    }

    /// Stops playback at the next step boundary. Playback cannot be
    /// restarted on a cancelled player.
    pub fn cancel(&self) {
        self.shared.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.shared.cancel.is_cancelled()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Playback {
    /// Steps handed to the callback.
    pub shown: usize,
    /// Whether every step was shown.
    pub completed: bool,
}

/// Reveals steps strictly in order with a delay between them.
#[derive(Debug)]
pub struct Player {
    shared: Arc<Shared>,
}

impl Player {
    pub fn new(delay: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                paused: watch::Sender::new(false),
                delay: watch::Sender::new(delay),
                cancel: CancellationToken::new(),
            }),
        }
    }

    pub fn handle(&self) -> PlaybackHandle {
        PlaybackHandle {
            shared: self.shared.clone(),
        }
    }

    pub async fn play(&self, steps: &[Step], mut on_step: impl FnMut(usize, &Step)) -> Playback {
        let mut shown = 0;

        for (i, step) in steps.iter().enumerate() {
            if !self.wait_while_paused().await {
                break;
            }

            on_step(i, step);
            shown += 1;

            if i + 1 < steps.len() && !self.pause_between_steps().await {
                break;
            }
        }

        let playback = Playback {
            shown,
            completed: shown == steps.len(),
        };
        info!(shown, total = steps.len(), completed = playback.completed, "playback");
        playback
    }

    /// Returns false if cancelled while waiting.
    async fn wait_while_paused(&self) -> bool {
        let cancel = &self.shared.cancel;
        if cancel.is_cancelled() {
            return false;
        }

        let mut paused = self.shared.paused.subscribe();
        if *paused.borrow_and_update() {
            debug!("playback_paused");
        }

        tokio::select! {
            resumed = paused.wait_for(|p| !*p) => resumed.is_ok(),
            _ = cancel.cancelled() => false,
        }
    }

    async fn pause_between_steps(&self) -> bool {
        let delay = *self.shared.delay.borrow();
        tokio::select! {
            _ = tokio::time::sleep(delay) => true,
            _ = self.shared.cancel.cancelled() => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use tokio::time::Instant;

    use super::*;
    use crate::{sort::sort_with_steps, Entity, Verbosity};

    fn steps() -> Vec<Step> {
        let people = [60.0, 20.0, 90.0, 40.0]
            .iter()
            .enumerate()
            .map(|(i, &w)| Entity::new(i as u64 + 1, w).unwrap());
        sort_with_steps(people, Verbosity::Detailed).steps
    }

    #[test]
    fn timeline_scrubs() {
        let all = steps();
        let mut timeline = Timeline::new(all.clone());
        assert_eq!(timeline.current(), Some(&all[0]));
        assert_eq!(timeline.back(), Some(&all[0]));
        assert_eq!(timeline.advance(), Some(&all[1]));
        assert_eq!(timeline.advance(), Some(&all[2]));
        assert_eq!(timeline.back(), Some(&all[1]));

        let last = all.len() - 1;
        assert_eq!(timeline.seek(last), Some(&all[last]));
        assert!(timeline.is_finished());
        assert_eq!(timeline.advance(), Some(&all[last]));
        assert_eq!(timeline.seek(last + 10), Some(&all[last]));
    }

    #[test]
    fn empty_timeline() {
        let mut timeline = Timeline::default();
        assert!(timeline.current().is_none());
        assert!(timeline.advance().is_none());
        assert!(timeline.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn plays_in_order_with_delay() {
        let all = steps();
        let player = Player::new(Duration::from_millis(400));
        let mut seen = vec![];

        let start = Instant::now();
        let playback = player.play(&all, |i, _| seen.push(i)).await;

        assert_eq!(playback, Playback { shown: all.len(), completed: true });
        assert_eq!(seen, (0..all.len()).collect::<Vec<_>>());
        assert_eq!(start.elapsed(), Duration::from_millis(400) * (all.len() as u32 - 1));
    }

    #[tokio::test(start_paused = true)]
    async fn pause_holds_the_next_step() {
        let all = steps();
        let total = all.len();
        let player = Player::new(Duration::from_millis(100));
        let handle = player.handle();
        let seen = Arc::new(Mutex::new(0usize));

        handle.pause();
        let task = tokio::spawn({
            let seen = seen.clone();
            async move { player.play(&all, |_, _| *seen.lock().unwrap() += 1).await }
        });

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(*seen.lock().unwrap(), 0);
        assert!(handle.is_paused());

        assert!(!handle.toggle_pause());
        let playback = task.await.unwrap();
        assert!(playback.completed);
        assert_eq!(*seen.lock().unwrap(), total);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_at_step_boundary() {
        let all = steps();
        let player = Player::new(Duration::from_millis(800));
        let handle = player.handle();

        let playback = player
            .play(&all, |i, _| {
                if i == 1 {
                    handle.cancel();
                }
            })
            .await;

        assert_eq!(playback, Playback { shown: 2, completed: false });
        assert!(handle.is_cancelled());

        let again = player.play(&all, |_, _| {}).await;
        assert_eq!(again.shown, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn delay_can_change_mid_playback() {
        let all: Vec<Step> = steps().into_iter().take(3).collect();
        let player = Player::new(Duration::from_millis(1200));
        let handle = player.handle();

        let start = Instant::now();
        player
            .play(&all, |i, _| {
                if i == 0 {
                    handle.set_delay(Duration::from_millis(400));
                }
            })
            .await;
        assert_eq!(start.elapsed(), Duration::from_millis(800));
    }
}
