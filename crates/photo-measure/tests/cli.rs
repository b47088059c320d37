use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn photo_measure() -> Command {
    Command::cargo_bin("photo-measure").expect("binary")
}

/// 5x3 depth image whose brightness ramps left to right.
fn write_ramp_depth(dir: &Path) -> std::path::PathBuf {
    let img = image::GrayImage::from_fn(5, 3, |x, _| image::Luma([(x * 60) as u8]));
    let path = dir.join("depth.png");
    img.save(&path).expect("write depth png");
    path
}

#[test]
fn scale_reports_meters_and_user_unit() {
    photo_measure()
        .args(["scale", "--p1", "0,0", "--p2", "30,40", "--length", "100"])
        .args(["--unit", "cm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pixel distance: 50.00 px"))
        .stdout(predicate::str::contains("0.020000 m/px"))
        .stdout(predicate::str::contains("1 px = 2.00000 cm"));
}

#[test]
fn scale_rejects_coincident_points() {
    photo_measure()
        .args(["scale", "--p1", "7,7", "--p2", "7,7", "--length", "1", "--unit", "m"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("degenerate calibration"));
}

#[test]
fn area_of_rectangle() {
    photo_measure()
        .args(["area", "--p1", "0,0", "--p2", "0,50", "--length", "1", "--unit", "m"])
        .args(["--polygon", "5,5 25,5 25,15 5,15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("area: 200.00 px^2"))
        .stdout(predicate::str::contains("real area: 0.0800 m^2"));
}

#[test]
fn area_needs_three_vertices() {
    photo_measure()
        .args(["area", "--p1", "0,0", "--p2", "0,50", "--length", "1", "--unit", "m"])
        .args(["--polygon", "5,5 25,5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 3 vertices"));
}

#[test]
fn calibration_unit_is_required() {
    photo_measure()
        .args(["scale", "--p1", "0,0", "--p2", "30,40", "--length", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--unit"));
}

#[test]
fn polygon_accepts_negative_vertices_before_other_flags() {
    // Same 20x10 rectangle as above, shifted 10 px left of the image edge.
    photo_measure()
        .arg("area")
        .args(["--polygon", "-5,5 15,5 15,15 -5,15"])
        .args(["--p1", "0,0", "--p2", "0,50", "--length", "1", "--unit", "m"])
        .assert()
        .success()
        .stdout(predicate::str::contains("area: 200.00 px^2"));
}

#[test]
fn non_finite_vertex_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let depth = write_ramp_depth(dir.path());

    photo_measure()
        .arg("volume")
        .arg("--depth")
        .arg(&depth)
        .args(["--polygon", "0,0 inf,0 0,2"])
        .args(["--h-real-max", "2", "--pixel-scale", "0.1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("non-finite"));
}

#[test]
fn far_off_vertex_is_clipped_to_the_image() {
    let dir = tempfile::tempdir().expect("tempdir");
    let depth = write_ramp_depth(dir.path());

    // Covers the whole 5x3 image: 15 px of 0.01 m^2.
    photo_measure()
        .arg("volume")
        .arg("--depth")
        .arg(&depth)
        .args(["--polygon", "0,0 1e19,0 0,4"])
        .args(["--h-real-max", "2", "--pixel-scale", "0.1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("base area: 0.15 m^2"));
}

#[test]
fn volume_from_depth_image() {
    let dir = tempfile::tempdir().expect("tempdir");
    let depth = write_ramp_depth(dir.path());

    photo_measure()
        .arg("volume")
        .arg("--depth")
        .arg(&depth)
        .args(["--h-real-max", "2", "--pixel-scale", "0.1"])
        .args(["--polygon", "1,0 3,0 3,2 1,2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("base area: 0.09 m^2"))
        .stdout(predicate::str::contains("max height: 2.00 m"))
        .stdout(predicate::str::contains("mean height: 1.00 m"))
        .stdout(predicate::str::contains("volume: 0.09 m^3"))
        .stdout(predicate::str::contains("mass (density 2.98 t/m^3): 0.27 t"));
}

#[test]
fn volume_json_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let depth = write_ramp_depth(dir.path());

    let out = photo_measure()
        .arg("--json")
        .arg("volume")
        .arg("--depth")
        .arg(&depth)
        .args(["--h-real-max", "2", "--pixel-scale", "0.1", "--density", "1.5"])
        .args(["--polygon", "1,0 3,0 3,2 1,2"])
        .output()
        .expect("run");
    assert!(out.status.success());

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json");
    assert_eq!(v["pixel_count"], 9);
    let volume = v["volume_m3"].as_f64().expect("volume");
    assert!((volume - 0.09).abs() < 1e-9);
    let mass = v["mass_t"].as_f64().expect("mass");
    assert!((mass - 0.135).abs() < 1e-9);
}

#[test]
fn volume_rejects_flat_region() {
    let dir = tempfile::tempdir().expect("tempdir");
    let depth = write_ramp_depth(dir.path());

    // A single column has one depth value.
    photo_measure()
        .arg("volume")
        .arg("--depth")
        .arg(&depth)
        .args(["--h-real-max", "2", "--pixel-scale", "0.1"])
        .args(["--polygon", "2,0 2,2 2,1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("constant"));
}

#[test]
fn run_job_file_with_relative_depth_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_ramp_depth(dir.path());
    let job = dir.path().join("job.json");
    std::fs::write(
        &job,
        r#"{
            "area": {
                "calibration": {"p1": [0, 0], "p2": [30, 40], "reference_length": 100, "unit": "cm"},
                "polygon": [[5, 5], [25, 5], [25, 15], [5, 15]]
            },
            "volume": {
                "depth_image": "depth.png",
                "polygon": [[1, 0], [3, 0], [3, 2], [1, 2]],
                "h_real_max": 2.0,
                "pixel_scale": 0.1
            }
        }"#,
    )
    .expect("write job");

    photo_measure()
        .arg("run")
        .arg("--job")
        .arg(&job)
        .assert()
        .success()
        .stdout(predicate::str::contains("real area: 0.0800 m^2"))
        .stdout(predicate::str::contains("volume: 0.09 m^3"));
}

#[test]
fn run_rejects_job_without_unit() {
    let dir = tempfile::tempdir().expect("tempdir");
    let job = dir.path().join("job.json");
    std::fs::write(
        &job,
        r#"{
            "area": {
                "calibration": {"p1": [0, 0], "p2": [0, 50], "reference_length": 100},
                "polygon": [[5, 5], [25, 5], [25, 15], [5, 15]]
            }
        }"#,
    )
    .expect("write job");

    photo_measure()
        .arg("run")
        .arg("--job")
        .arg(&job)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing field `unit`"));
}

#[test]
fn run_reports_missing_job_file() {
    photo_measure()
        .args(["run", "--job", "/nonexistent/job.json"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error:"));
}
