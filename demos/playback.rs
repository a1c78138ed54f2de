use std::time::Duration;

use heap_steps::{
    dataset,
    player::{Player, Timeline},
    sort_with_steps, Speed, Verbosity,
};

#[tokio::main]
async fn main() -> heap_steps::Result<()> {
    tracing_subscriber::fmt::init();

    let people = dataset::generate(8, 1, 42, dataset::DEFAULT_WEIGHTS)?;
    let run = sort_with_steps(people, Verbosity::Selection);

    let player = Player::new(Speed::Fast.delay());
    let handle = player.handle();

    // a viewer that pauses for a moment, speeds up, then loses interest
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(2)).await;
        handle.pause();
        tokio::time::sleep(Duration::from_secs(1)).await;
        handle.set_delay(Duration::from_millis(100));
        handle.resume();
        tokio::time::sleep(Duration::from_secs(3)).await;
        handle.cancel();
    });

    let playback = player
        .play(&run.steps, |i, step| {
            let sorted = step.sorted_so_far.as_deref().unwrap_or_default();
            println!("{i:>3} {:<40} sorted: {}", step.description, sorted.len());
        })
        .await;
    println!("shown {} of {} steps", playback.shown, run.steps.len());

    // scrub back from wherever playback stopped
    let mut timeline = Timeline::new(run.steps);
    timeline.seek(playback.shown.saturating_sub(1));
    for _ in 0..3 {
        if let Some(description) = timeline.back().map(|step| step.description.clone()) {
            println!("back to {}: {}", timeline.position(), description);
        }
    }

    Ok(())
}
