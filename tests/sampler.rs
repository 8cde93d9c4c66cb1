//! Frame sampler behavior: priming, timeout absorption, frame-count
//! invariants.

mod common;

use reloop::{ConvertOptions, FrameSampler, ReloopError, SamplePlan};

use common::{ScriptedSource, SeekScript, delivering_script, synthetic_clip};

fn plan_for(duration_secs: f64) -> SamplePlan {
    SamplePlan::derive(&synthetic_clip(320, 180, duration_secs), &ConvertOptions::new())
        .unwrap()
}

#[test]
fn emits_exactly_one_frame_per_plan_index() {
    let plan = plan_for(2.0);
    let options = ConvertOptions::new();
    let mut source = ScriptedSource::new(plan.width, plan.height, delivering_script(20));

    let mut indices = Vec::new();
    let stats = FrameSampler::new(&mut source, &plan, &options)
        .run(|index, _frame, _stats| {
            indices.push(index);
            Ok(())
        })
        .unwrap();

    assert_eq!(stats.frames_emitted, 20);
    assert_eq!(stats.seek_timeouts, 0);
    assert_eq!(indices, (0..20).collect::<Vec<_>>());
}

#[test]
fn requests_priming_then_one_seek_per_frame() {
    let plan = plan_for(1.0);
    let options = ConvertOptions::new();
    let mut source = ScriptedSource::new(plan.width, plan.height, delivering_script(10));

    FrameSampler::new(&mut source, &plan, &options)
        .run(|_, _, _| Ok(()))
        .unwrap();

    // One priming request at t=0, then the ten plan timestamps.
    assert_eq!(source.requested.len(), 11);
    assert_eq!(source.requested[0], plan.timestamp_for(0));
    assert_eq!(source.requested[1], plan.timestamp_for(0));
    assert_eq!(source.requested[10], plan.timestamp_for(9));
}

#[test]
fn timed_out_seek_reuses_previous_frame_without_gap() {
    let plan = plan_for(1.0);
    let options = ConvertOptions::new();

    // Prime, deliver three frames, stall twice mid-run, deliver the rest.
    let mut script = vec![SeekScript::Deliver([9, 9, 9, 255])];
    script.extend([
        SeekScript::Deliver([10, 0, 0, 255]),
        SeekScript::Deliver([20, 0, 0, 255]),
        SeekScript::Deliver([30, 0, 0, 255]),
        SeekScript::Stall,
        SeekScript::Stall,
        SeekScript::Deliver([60, 0, 0, 255]),
        SeekScript::Deliver([70, 0, 0, 255]),
        SeekScript::Deliver([80, 0, 0, 255]),
        SeekScript::Deliver([90, 0, 0, 255]),
        SeekScript::Deliver([100, 0, 0, 255]),
    ]);
    let mut source = ScriptedSource::new(plan.width, plan.height, script);

    let mut reds = Vec::new();
    let stats = FrameSampler::new(&mut source, &plan, &options)
        .run(|_, frame, _| {
            reds.push(frame.get_pixel(0, 0)[0]);
            Ok(())
        })
        .unwrap();

    assert_eq!(stats.frames_emitted, 10);
    assert_eq!(stats.seek_timeouts, 2);
    // Stalled indices repeat the last presented frame.
    assert_eq!(reds, vec![10, 20, 30, 30, 30, 60, 70, 80, 90, 100]);
}

#[test]
fn all_seeks_timing_out_still_fills_the_plan() {
    let plan = plan_for(1.0);
    let options = ConvertOptions::new();

    // Only priming succeeds; every subsequent seek stalls.
    let mut script = vec![SeekScript::Deliver([42, 0, 0, 255])];
    script.extend(std::iter::repeat_n(SeekScript::Stall, 10));
    let mut source = ScriptedSource::new(plan.width, plan.height, script);

    let mut frames = 0u64;
    let stats = FrameSampler::new(&mut source, &plan, &options)
        .run(|_, frame, _| {
            assert_eq!(frame.get_pixel(0, 0)[0], 42);
            frames += 1;
            Ok(())
        })
        .unwrap();

    assert_eq!(frames, 10);
    assert_eq!(stats.frames_emitted, 10);
    assert_eq!(stats.seek_timeouts, 10);
}

#[test]
fn clip_that_never_presents_fails_with_stall() {
    let plan = plan_for(1.0);
    let options = ConvertOptions::new();
    let mut source = ScriptedSource::new(plan.width, plan.height, vec![SeekScript::Stall]);

    let result = FrameSampler::new(&mut source, &plan, &options).run(|_, _, _| Ok(()));
    match result {
        Err(ReloopError::ClipStalled { waited }) => {
            assert_eq!(waited, reloop::DEFAULT_LOAD_TIMEOUT);
        }
        other => panic!("Expected ClipStalled, got: {other:?}"),
    }
}

#[test]
fn sink_errors_abort_the_run() {
    let plan = plan_for(1.0);
    let options = ConvertOptions::new();
    let mut source = ScriptedSource::new(plan.width, plan.height, delivering_script(10));

    let result = FrameSampler::new(&mut source, &plan, &options).run(|index, _, _| {
        if index == 3 {
            Err(ReloopError::GifEncode("sink rejected frame".to_string()))
        } else {
            Ok(())
        }
    });
    assert!(matches!(result, Err(ReloopError::GifEncode(_))));
}

#[test]
fn running_stats_are_visible_to_the_sink() {
    let plan = plan_for(1.0);
    let options = ConvertOptions::new();

    let mut script = vec![SeekScript::Deliver([1, 1, 1, 255])];
    script.push(SeekScript::Stall);
    script.extend(std::iter::repeat_n(SeekScript::Deliver([2, 2, 2, 255]), 9));
    let mut source = ScriptedSource::new(plan.width, plan.height, script);

    let mut first_frame_timeouts = None;
    FrameSampler::new(&mut source, &plan, &options)
        .run(|index, _, stats| {
            if index == 0 {
                first_frame_timeouts = Some(stats.seek_timeouts);
            }
            Ok(())
        })
        .unwrap();

    // The very first plan seek stalled, and the sink saw the count.
    assert_eq!(first_frame_timeouts, Some(1));
}
