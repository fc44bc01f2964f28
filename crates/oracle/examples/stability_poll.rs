//! Stability Polling Example
//!
//! Simulates a transliterator whose output arrives in pieces and shows how
//! `StabilityPoller` waits for it to settle. A `FakeClock` keeps the demo
//! instant while reporting the same read counts a live page would see.
//!
//! # Running
//!
//! ```bash
//! cargo run --example stability_poll -p singlish-oracle
//! ```

use oracle::{FakeClock, FnReader, StabilityOptions, StabilityPoller};
use std::convert::Infallible;
use std::time::Duration;

fn main() {
    println!("=== Singlish Oracle Stability Polling Example ===\n");

    demo_incremental_output();
    demo_never_settles();
}

/// Output grows for a few reads, then stops changing
fn demo_incremental_output() {
    println!("--- incremental output ---");
    let frames = ["", "ම", "මම", "මම ගෙදර", "මම ගෙදර යනවා"];
    let clock = FakeClock::shared();
    let poller = StabilityPoller::with_clock(StabilityOptions::default(), clock.clone());

    let mut reads = 0usize;
    let mut reader = FnReader::new(|| {
        let frame = frames[reads.min(frames.len() - 1)];
        reads += 1;
        Ok::<_, Infallible>(frame.to_string())
    });

    match poller.await_stable(&mut reader) {
        Ok(stable) => println!(
            "  {:?} after {} reads, {}ms ({})",
            stable.text, stable.reads, stable.elapsed_ms, stable.outcome
        ),
        Err(never) => match never {},
    }
}

/// Output keeps flickering; the poller gives up with a final read
fn demo_never_settles() {
    println!("\n--- flickering output ---");
    let clock = FakeClock::shared();
    let options = StabilityOptions::default()
        .with_timeout(2_000)
        .with_poll_interval(100);
    let poller = StabilityPoller::with_clock(options, clock.clone());

    let mut tick = 0u32;
    let mut reader = FnReader::new(|| {
        tick += 1;
        Ok::<_, Infallible>(format!("ගෙදර {tick}"))
    });

    match poller.await_stable(&mut reader) {
        Ok(stable) => println!(
            "  {:?} after {} reads, {}ms ({}), clock at {:?}",
            stable.text,
            stable.reads,
            stable.elapsed_ms,
            stable.outcome,
            Duration::from_millis(clock.now_ms())
        ),
        Err(never) => match never {},
    }
}
