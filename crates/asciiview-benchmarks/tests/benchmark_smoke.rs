//! Benchmark smoke test for the playback/debounce/progress hot loop.

use std::time::Instant;

use asciiview_core::ExportKind;
use asciiview_playback::{Debouncer, PlaybackController, TickOutcome};
use asciiview_progress::{estimate_export_ms, ProgressSimulator};

#[test]
fn benchmark_session_loop_prints_latency() {
    let start = Instant::now();
    let mut frames_fetched = 0usize;
    let mut debounce_fires = 0usize;
    let mut percent_total = 0u64;

    for round in 0..100_u64 {
        let mut playback =
            PlaybackController::new(30.0, 10.0).expect("controller should be valid");
        let mut debouncer = Debouncer::default();
        playback.play();

        let mut now_ms = round * 10_000;
        for _ in 0..300 {
            now_ms += playback.frame_interval_ms();
            debouncer.poke(now_ms);
            if debouncer.fire(now_ms + 300) {
                debounce_fires += 1;
            }
            match playback.tick() {
                TickOutcome::FetchFrame(_) => frames_fetched += 1,
                TickOutcome::Finished => break,
                TickOutcome::Ignored => {}
            }
        }

        let estimate = estimate_export_ms(ExportKind::Video, 300);
        let mut simulator =
            ProgressSimulator::start(now_ms, estimate).expect("estimate should be nonzero");
        for step in 0..50 {
            percent_total += u64::from(simulator.poll(now_ms + step * 100));
        }
        simulator.complete();
        percent_total += u64::from(simulator.percent());
    }

    let elapsed_ms = start.elapsed().as_millis();
    println!("benchmark_session_loop_elapsed_ms={elapsed_ms}");
    println!("benchmark_frames_fetched={frames_fetched}");
    println!("benchmark_debounce_fires={debounce_fires}");
    println!("benchmark_percent_total={percent_total}");

    // This is a lightweight guardrail; strict NFR checks are environment-specific.
    assert!(
        elapsed_ms < 5_000,
        "session loop smoke benchmark should stay bounded"
    );
}
