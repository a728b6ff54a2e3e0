use std::path::{Path, PathBuf};

use mandelzoom::{
    FailureMode, RecordingRunner, RunOutcome, ZoomOpts, ZoomSchedule, render_zoom,
};

fn opts_with_frames(frames: u32) -> ZoomOpts {
    let mut opts = ZoomOpts::new("-0.74364", "0.13182", "4.0");
    opts.schedule = ZoomSchedule::new(frames).unwrap();
    opts.out_path = PathBuf::from("target").join("pipeline_drive").join("out.gif");
    opts
}

fn args_of(spec: &mandelzoom::CommandSpec) -> Vec<String> {
    spec.args
        .iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

#[test]
fn lenient_run_invokes_renderer_per_frame_then_encoder_once() {
    let mut runner = RecordingRunner::new();
    let opts = opts_with_frames(4);

    let stats = render_zoom(&opts, &mut runner).unwrap();
    assert_eq!(stats.frames_total, 4);
    assert_eq!(stats.frames_rendered, 4);
    assert_eq!(stats.frames_failed, 0);

    // Preflight, four renderer invocations, one encoder invocation.
    let calls = runner.calls();
    assert_eq!(calls.len(), 6);

    assert_eq!(calls[0].program, std::ffi::OsString::from("ffmpeg"));
    assert_eq!(args_of(&calls[0]), vec!["-version"]);

    let mut prev_scale = f64::INFINITY;
    let mut prev_limit = 0.0;
    for (i, call) in calls[1..5].iter().enumerate() {
        let args = args_of(call);
        assert_eq!(args.len(), 6);
        assert_eq!(&args[0..3], &["-0.74364", "0.13182", "4.0"]);

        let limit: f64 = args[3].parse().unwrap();
        let scale: f64 = args[4].parse().unwrap();
        assert!(limit > prev_limit, "limit not increasing at frame {}", i + 1);
        assert!(scale < prev_scale, "scale not decreasing at frame {}", i + 1);
        prev_limit = limit;
        prev_scale = scale;

        let out_file = Path::new(&args[5]);
        assert!(out_file.is_absolute());
        assert_eq!(
            out_file.file_name().unwrap().to_string_lossy(),
            format!("{:04}.png", i + 1)
        );
    }

    let encode = &calls[5];
    assert_eq!(encode.program, std::ffi::OsString::from("ffmpeg"));
    let encode_args = args_of(encode);
    assert!(encode_args.contains(&"image2".to_string()));
    assert!(encode_args.contains(&"%04d.png".to_string()));
    assert!(encode_args.contains(&"30".to_string()));

    // The encoder runs from inside the scratch directory, which is the
    // directory the frame files were written into.
    let scratch = encode.cwd.as_deref().expect("encoder cwd set");
    let frame_arg = args_of(&calls[1])[5].clone();
    assert_eq!(Path::new(&frame_arg).parent().unwrap(), scratch);
}

#[test]
fn scratch_directory_is_removed_after_success() {
    let mut runner = RecordingRunner::new();
    let opts = opts_with_frames(2);

    render_zoom(&opts, &mut runner).unwrap();

    let scratch = runner.calls()[3].cwd.clone().expect("encoder cwd set");
    assert!(!scratch.exists());
}

#[test]
fn lenient_mode_continues_past_failed_frames() {
    let mut runner = RecordingRunner::new();
    // Preflight succeeds, frame 1 succeeds, frame 2 fails.
    runner.push_outcome(RunOutcome::success());
    runner.push_outcome(RunOutcome::success());
    runner.push_outcome(RunOutcome::failure(139, "segfault"));

    let opts = opts_with_frames(3);
    let stats = render_zoom(&opts, &mut runner).unwrap();

    assert_eq!(stats.frames_total, 3);
    assert_eq!(stats.frames_rendered, 2);
    assert_eq!(stats.frames_failed, 1);
    // All three frames were attempted and the encoder still ran.
    assert_eq!(runner.calls().len(), 5);
}

#[test]
fn lenient_mode_survives_a_renderer_that_cannot_be_spawned() {
    let mut runner = RecordingRunner::new();
    runner.push_outcome(RunOutcome::success()); // preflight
    runner.push_error(mandelzoom::ZoomError::process(
        "failed to run './mandelbrot': No such file or directory",
    ));

    let opts = opts_with_frames(2);
    let stats = render_zoom(&opts, &mut runner).unwrap();

    assert_eq!(stats.frames_failed, 1);
    assert_eq!(stats.frames_rendered, 1);
    // Both frames attempted, encoder still invoked.
    assert_eq!(runner.calls().len(), 4);
}

#[test]
fn strict_mode_stops_at_first_failed_frame() {
    let mut runner = RecordingRunner::new();
    runner.push_outcome(RunOutcome::success());
    runner.push_outcome(RunOutcome::success());
    runner.push_outcome(RunOutcome::failure(1, "bad coordinates"));

    let mut opts = opts_with_frames(3);
    opts.on_failure = FailureMode::Strict;

    let err = render_zoom(&opts, &mut runner).unwrap_err();
    assert!(err.to_string().contains("frame 2"));
    assert!(err.to_string().contains("bad coordinates"));

    // Preflight + two renderer attempts; no third frame, no encoder.
    assert_eq!(runner.calls().len(), 3);

    let scratch = runner.calls()[1]
        .args
        .last()
        .map(|a| PathBuf::from(a).parent().unwrap().to_path_buf())
        .unwrap();
    assert!(!scratch.exists(), "scratch must be cleaned up on error");
}

#[test]
fn missing_ffmpeg_aborts_before_any_render() {
    let mut runner = RecordingRunner::new();
    runner.push_outcome(RunOutcome::failure(127, "ffmpeg: not found"));

    let opts = opts_with_frames(3);
    let err = render_zoom(&opts, &mut runner).unwrap_err();
    assert!(err.to_string().contains("ffmpeg"));
    assert_eq!(runner.calls().len(), 1);
}

#[test]
fn encoder_failure_is_an_error_even_in_lenient_mode() {
    let mut runner = RecordingRunner::new();
    runner.push_outcome(RunOutcome::success()); // preflight
    runner.push_outcome(RunOutcome::success()); // frame 1
    runner.push_outcome(RunOutcome::failure(1, "invalid frame sequence")); // encode

    let opts = opts_with_frames(1);
    let err = render_zoom(&opts, &mut runner).unwrap_err();
    assert!(err.to_string().contains("ffmpeg exited with status 1"));
}
