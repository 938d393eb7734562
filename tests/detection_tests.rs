use ndarray::Array2;
use swdetect::{
    detect, occupancy_mask, Detector, MaskPolicy, MaskShape, Recording, ThresholdConfig,
};

const SF: f64 = 100.0;
const N: usize = 1000; // 10 seconds

fn recording_from(rows: Vec<Vec<f64>>, names: &[&str]) -> Recording {
    let n = rows[0].len();
    let mut data = Array2::zeros((rows.len(), n));
    for (r, row) in rows.iter().enumerate() {
        for (c, &v) in row.iter().enumerate() {
            data[(r, c)] = v;
        }
    }
    let names = names.iter().map(|s| s.to_string()).collect();
    Recording::new(data, SF, names).unwrap()
}

/// A -80 uV deflection sustained for 0.4 s immediately followed by
/// +40 uV for 0.3 s, starting at t = 2.0 s.
fn scenario_channel() -> Vec<f64> {
    (0..N)
        .map(|i| {
            let t = i as f64 / SF;
            if (2.0..2.4).contains(&t) {
                -80.0
            } else if (2.4..2.7).contains(&t) {
                40.0
            } else {
                0.0
            }
        })
        .collect()
}

/// Sub-threshold in-band noise, a few microvolts at most.
fn noise_channel(phase: f64) -> Vec<f64> {
    (0..N)
        .map(|i| {
            let t = i as f64 / SF;
            2.0 * (2.0 * std::f64::consts::PI * 1.1 * t + phase).sin()
                + 1.5 * (2.0 * std::f64::consts::PI * 0.7 * t + 2.0 * phase).cos()
        })
        .collect()
}

fn sine_channel(freq: f64, amp: f64) -> Vec<f64> {
    (0..N)
        .map(|i| amp * (2.0 * std::f64::consts::PI * freq * i as f64 / SF).sin())
        .collect()
}

#[test]
fn test_three_channel_scenario() {
    let rec = recording_from(
        vec![scenario_channel(), noise_channel(0.4), noise_channel(1.3)],
        &["Cz", "Fz", "Pz"],
    );
    let table = detect(&rec, ThresholdConfig::default()).unwrap();

    assert_eq!(table.len(), 1, "expected exactly one event, got {:?}", table);
    let event = &table.events()[0];
    assert_eq!(event.channel, "Cz");
    assert_eq!(event.idx_channel, 0);
    assert!((event.start - 2.0).abs() < 0.15, "start {}", event.start);
    assert!((event.end - 2.7).abs() < 0.2, "end {}", event.end);
    assert!(event.val_neg_peak < -40.0);
    assert!(event.val_pos_peak > 10.0);
    assert_eq!(table.channel_events(1).count(), 0);
    assert_eq!(table.channel_events(2).count(), 0);

    let mask = occupancy_mask(&table, MaskShape::from(&rec)).unwrap();
    assert_eq!(mask.dim(), (3, N));
    // only channel 0 is occupied, roughly over samples [200, 270)
    assert!(mask.row(1).iter().all(|&b| !b));
    assert!(mask.row(2).iter().all(|&b| !b));
    let true_count = mask.row(0).iter().filter(|&&b| b).count();
    assert_eq!(true_count, (event.duration * SF).round() as usize);
    assert!(mask.row(0).iter().skip(215).take(40).all(|&b| b));
    assert!(mask.row(0).iter().take(170).all(|&b| !b));
    assert!(mask.row(0).iter().skip(300).all(|&b| !b));
}

#[test]
fn test_channel_independence() {
    let rows = vec![
        sine_channel(0.9, 60.0),
        scenario_channel(),
        sine_channel(0.7, 80.0),
    ];
    let names = ["A", "B", "C"];
    let rec = recording_from(rows.clone(), &names);
    let full = detect(&rec, ThresholdConfig::default()).unwrap();

    for (ci, row) in rows.into_iter().enumerate() {
        let single = recording_from(vec![row], &[names[ci]]);
        let alone = detect(&single, ThresholdConfig::default()).unwrap();
        let from_full: Vec<_> = full.channel_events(ci).cloned().collect();
        let adjusted: Vec<_> = alone
            .iter()
            .cloned()
            .map(|mut e| {
                e.idx_channel = ci;
                e
            })
            .collect();
        assert_eq!(from_full, adjusted, "channel {ci} differs");
    }
}

#[test]
fn test_determinism() {
    let rec = recording_from(
        vec![sine_channel(0.9, 60.0), scenario_channel(), noise_channel(0.1)],
        &["A", "B", "C"],
    );
    let first = detect(&rec, ThresholdConfig::default()).unwrap();
    let second = detect(&rec, ThresholdConfig::default()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_relaxed_criteria_yield_superset() {
    // 30 uV waves pass the duration criterion but fail the amplitude ones
    let rec = recording_from(vec![sine_channel(0.9, 30.0)], &["Cz"]);

    let all = detect(&rec, ThresholdConfig::default()).unwrap();

    let mut duration_only = ThresholdConfig::none();
    duration_only.duration = Some((0.3, 1.5));
    let relaxed = detect(&rec, duration_only).unwrap();

    assert!(relaxed.len() >= all.len());
    assert!(relaxed.len() > 0, "relaxed run should find the 30 uV waves");
    assert_eq!(all.len(), 0, "default thresholds should reject 30 uV waves");
}

#[test]
fn test_event_invariants() {
    let rec = recording_from(
        vec![
            sine_channel(0.9, 60.0),
            scenario_channel(),
            sine_channel(0.7, 80.0),
        ],
        &["A", "B", "C"],
    );
    let table = detect(&rec, ThresholdConfig::default()).unwrap();
    assert!(table.len() > 10, "expected plenty of events, got {}", table.len());

    let mut prev: Option<&swdetect::Event> = None;
    for e in &table {
        assert!(e.start <= e.neg_peak);
        assert!(e.neg_peak <= e.mid_crossing);
        assert!(e.mid_crossing <= e.pos_peak);
        assert!(e.pos_peak <= e.end);
        assert!((e.duration - (e.end - e.start)).abs() < 1e-9);
        assert!(e.val_neg_peak < 0.0);
        assert!(e.val_pos_peak > 0.0);
        assert_eq!(e.ptp, e.val_pos_peak - e.val_neg_peak);
        assert_eq!(e.slope, e.ptp / (e.pos_peak - e.neg_peak));
        assert!(e.frequency > 0.0);

        if let Some(p) = prev {
            // grouped by channel, chronological and non-overlapping inside
            // each group
            assert!(p.idx_channel <= e.idx_channel);
            if p.idx_channel == e.idx_channel {
                assert!(p.start < e.start);
                assert!(e.start >= p.end - 1e-9);
            }
        }
        prev = Some(e);
    }
}

#[test]
fn test_frequency_tracks_the_oscillation() {
    let rec = recording_from(vec![sine_channel(0.9, 60.0)], &["Cz"]);
    let table = detect(&rec, ThresholdConfig::default()).unwrap();
    assert!(table.len() > 3);
    for e in &table {
        assert!((e.frequency - 0.9).abs() < 0.15, "frequency {}", e.frequency);
    }
}

#[test]
fn test_mask_true_count_matches_event_durations() {
    let rec = recording_from(
        vec![sine_channel(0.9, 60.0), sine_channel(0.7, 80.0)],
        &["A", "B"],
    );
    let table = detect(&rec, ThresholdConfig::default()).unwrap();
    let mask = occupancy_mask(&table, MaskShape::from(&rec)).unwrap();
    for ci in 0..2 {
        let expected: usize = table
            .channel_events(ci)
            .map(|e| (e.duration * SF).round() as usize)
            .sum();
        let got = mask.row(ci).iter().filter(|&&b| b).count();
        assert_eq!(got, expected, "channel {ci}");
    }
}

#[test]
fn test_inclusion_mask_drops_events_silently() {
    let rec = recording_from(vec![scenario_channel()], &["Cz"]);
    let detector = Detector::new(ThresholdConfig::default()).unwrap();

    let all_false = vec![false; N];
    let detection = detector.detect(&rec, Some(&all_false)).unwrap();
    assert!(detection.table.is_empty());
    assert!(detection.failures.is_empty());

    let all_true = vec![true; N];
    let detection = detector.detect(&rec, Some(&all_true)).unwrap();
    assert_eq!(detection.table.len(), 1);

    // excluding the onset region removes the event under the Start policy
    let mut mask = vec![true; N];
    for flag in mask.iter_mut().take(230).skip(180) {
        *flag = false;
    }
    let detection = detector.detect(&rec, Some(&mask)).unwrap();
    assert!(detection.table.is_empty());

    // under the NegPeak policy a mask excluding the whole negative lobe
    // drops the event, while one excluding only the onset keeps it
    // (the negative lobe spans roughly t = 2.0 .. 2.4 s)
    let neg_peak_detector = Detector::new(ThresholdConfig::default())
        .unwrap()
        .with_mask_policy(MaskPolicy::NegPeak);
    let mut lobe_excluded = vec![true; N];
    for flag in lobe_excluded.iter_mut().take(250).skip(180) {
        *flag = false;
    }
    let detection = neg_peak_detector.detect(&rec, Some(&lobe_excluded)).unwrap();
    assert!(detection.table.is_empty());

    let mut onset_only = vec![true; N];
    for flag in onset_only.iter_mut().take(200).skip(180) {
        *flag = false;
    }
    let detection = neg_peak_detector.detect(&rec, Some(&onset_only)).unwrap();
    assert_eq!(detection.table.len(), 1);

    // FullSpan requires every sample of the event to be included
    let full_span_detector = Detector::new(ThresholdConfig::default())
        .unwrap()
        .with_mask_policy(MaskPolicy::FullSpan);
    let detection = full_span_detector.detect(&rec, Some(&lobe_excluded)).unwrap();
    assert!(detection.table.is_empty());
    let detection = full_span_detector.detect(&rec, Some(&all_true)).unwrap();
    assert_eq!(detection.table.len(), 1);
}
