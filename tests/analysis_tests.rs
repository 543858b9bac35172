use nalgebra::{Rotation3, Vector3};
use oxdc_analysis::config::AnalysisConfig;
use oxdc_analysis::logging::CorrelationScope;
use oxdc_analysis::physics::ParameterTable;
use oxdc_analysis::report;
use oxdc_analysis::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

fn site() -> PointSet {
    // Metal centre with five donors, roughly octahedral
    PointSet::from_coords(&[
        [0.0, 0.0, 0.0],
        [2.2, 0.0, 0.0],
        [-2.1, 0.1, 0.0],
        [0.0, 2.2, 0.1],
        [0.1, -2.2, 0.0],
        [0.0, 0.0, 2.3],
    ])
}

fn thermal_trajectory(frames: usize, sd: f64, seed: u64) -> Vec<PointSet> {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, sd).unwrap();
    let reference = site();
    (0..frames)
        .map(|i| {
            let rotation = Rotation3::from_euler_angles(0.01 * i as f64, 0.3, -0.02 * i as f64);
            let moved = PointSet::new(
                reference
                    .iter()
                    .map(|p| {
                        rotation * p
                            + Vector3::new(noise.sample(&mut rng), noise.sample(&mut rng), noise.sample(&mut rng))
                    })
                    .collect(),
            );
            moved.translated(&Vector3::new(10.0, -4.0, 0.5 * i as f64))
        })
        .collect()
}

#[test]
fn test_stable_site_report() {
    let frames = thermal_trajectory(100, 0.05, 1);
    let report = analyze_rmsd(&site(), &frames, &AnalysisConfig::default()).unwrap();

    assert_eq!(report.frames.len(), 100);
    assert_eq!(report.failed_frames, 0);
    let series = &report.series;
    assert!(series.summary.mean > 0.0 && series.summary.mean < 0.2);
    assert!(series.converged);
    assert!(series.stable);
    assert_eq!(series.block_average.block_count(), 5);
}

#[test]
fn test_run_id_matches_correlation_id() {
    let scope = CorrelationScope::new();
    let frames = thermal_trajectory(20, 0.05, 2);
    let report = analyze_rmsd(&site(), &frames, &AnalysisConfig::default()).unwrap();
    assert_eq!(report.run().run_id, scope.id());
}

#[test]
fn test_rmsd_report_json() {
    let mut frames = thermal_trajectory(12, 0.05, 3);
    frames[5] = PointSet::from_coords(&[[0.0, 0.0, 0.0]; 2]);
    let report = analyze_rmsd(&site(), &frames, &AnalysisConfig::default()).unwrap();

    let json: serde_json::Value = serde_json::to_value(&report).unwrap();
    assert_eq!(json["failed_frames"], 1);
    assert!(json["frames"][5]["rmsd"].is_null());
    assert!(json["frames"][5]["error"]
        .as_str()
        .unwrap()
        .contains("Dimension mismatch"));
    assert!(json["series"]["run_id"].is_string());
    assert!(json["series"]["generated_at"].is_string());
    assert_eq!(json["series"]["summary"]["count"], 11);

    let text = report::render_rmsd(&report);
    assert!(text.contains("Frames: 12 (1 failed)"));
    assert!(text.contains("frame 5:"));
}

#[test]
fn test_drifting_series_is_flagged() {
    let mut rng = StdRng::seed_from_u64(4);
    let noise = Normal::new(0.0, 0.05).unwrap();
    // 0.02 Å per 10 ps frame is 2 Å/ns
    let series: Vec<f64> = (0..200).map(|i| 1.0 + 0.02 * i as f64 + noise.sample(&mut rng)).collect();
    let report = analyze_series("rmsd", &series, &AnalysisConfig::default()).unwrap();
    assert!((report.drift_per_ns - 2.0).abs() < 0.1);
    assert!(report.drift.r_squared > 0.99);
    assert!(!report.stable);
    assert!(report.equilibration.late_mean > report.equilibration.early_mean);
}

#[test]
fn test_pair_and_bonds_reports() {
    let x: Vec<f64> = (0..60).map(|i| 20.0 + i as f64).collect();
    let y: Vec<f64> = x.iter().map(|k| 3.0 / k).collect();
    let pair = analyze_pair("k", &x, "rmsd", &y, &AnalysisConfig::default()).unwrap();
    assert!(pair.correlation.r < -0.9);
    assert!(report::render_pair(&pair).contains("k vs rmsd"));

    let table = ParameterTable::from_toml_str(
        r#"
[[systems]]
name = "BiOx+2"
oxidation_state = "Mn(II)"

[[systems.bonds]]
ligand = "His95"
donor = "N"
r0 = 2.406
k = 14.0

[[systems]]
name = "empty+2"
oxidation_state = "Mn(II)"
bonds = []
"#,
    )
    .unwrap();
    let bonds = analyze_bonds(&table, 300.0).unwrap();
    assert_eq!(bonds.systems[1].overall_quality, None);
    let text = report::render_bonds(&bonds);
    assert!(text.contains("| BiOx+2 | His95 |"));
    assert!(text.contains("empty+2 [Mn(II), -]: no bonds"));
}

#[test]
fn test_trajectory_rmsf_finds_mobile_ligand() {
    let mut rng = StdRng::seed_from_u64(5);
    let noise = Normal::new(0.0, 0.02).unwrap();
    let mut coords: Vec<[f64; 3]> = site().iter().map(|p| [p.x, p.y, p.z]).collect();
    let frames: Vec<PointSet> = (0..40)
        .map(|i| {
            // The axial donor swings while the rest of the site stays put
            coords[5][2] = 2.3 + if i % 2 == 0 { 0.8 } else { -0.8 };
            let jittered: Vec<[f64; 3]> = coords
                .iter()
                .map(|c| {
                    [
                        c[0] + noise.sample(&mut rng),
                        c[1] + noise.sample(&mut rng),
                        c[2] + noise.sample(&mut rng),
                    ]
                })
                .collect();
            PointSet::from_coords(&jittered).translated(&Vector3::new(0.0, 0.0, 0.1 * i as f64))
        })
        .collect();

    let options = RmsdOptions::default();
    let report = analyze_trajectory_rmsf(&site(), &frames, &AnalysisConfig::default(), &options).unwrap();
    assert_eq!(report.frames_used, Some(40));
    assert!(report.skipped_frames.is_empty());
    assert_eq!(report.profile.len(), 6);

    let peak = report
        .profile
        .iter()
        .fold(report.profile[0], |best, r| if r.rmsf > best.rmsf { *r } else { best });
    assert_eq!(peak.residue, 6);
    assert!(peak.rmsf > 0.4);
    assert!(report.hotspots.is_empty());
    assert!(report::render_rmsf(&report).contains("Frames: 40 (0 skipped)"));
}
