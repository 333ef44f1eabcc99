use std::sync::Mutex;

use tempfile::NamedTempFile;

use drivewatch::config::PipelineConfig;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "DRIVEWATCH_CONFIG",
        "DRIVEWATCH_LABELS",
        "DRIVEWATCH_MODEL",
        "DRIVEWATCH_TARGET_FPS",
        "DRIVEWATCH_SCORE_THRESHOLD",
        "DRIVEWATCH_ALERT_CLASSES",
        "DRIVEWATCH_ALERT_CONFIDENCE",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn defaults_without_file_or_env() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = PipelineConfig::load().expect("load config");
    assert_eq!(cfg.labels_path, "labels.txt");
    assert_eq!(cfg.model.input_size, 300);
    assert_eq!(cfg.model.max_detections, 10);
    assert_eq!(cfg.model.score_threshold, 0.5);
    assert_eq!(cfg.camera.target_fps, 15);
    assert_eq!(
        cfg.alert.classes,
        vec!["person", "traffic light", "stop sign"]
    );
    assert_eq!(cfg.alert.min_confidence, 0.7);
}

#[test]
fn loads_config_from_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let json = r#"{
        "labels_path": "coco_labels.txt",
        "model": {
            "path": "ssd_mobilenet.onnx",
            "input_size": 320,
            "max_detections": 20,
            "score_threshold": 0.4
        },
        "camera": {
            "target_fps": 10,
            "width": 1280,
            "height": 720
        },
        "alert": {
            "classes": ["person", "bicycle"],
            "min_confidence": 0.6
        }
    }"#;
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");

    std::env::set_var("DRIVEWATCH_CONFIG", file.path());
    std::env::set_var("DRIVEWATCH_TARGET_FPS", "12");
    std::env::set_var("DRIVEWATCH_ALERT_CLASSES", "person, stop sign");

    let cfg = PipelineConfig::load().expect("load config");
    clear_env();

    assert_eq!(cfg.labels_path, "coco_labels.txt");
    assert_eq!(cfg.model.path, "ssd_mobilenet.onnx");
    assert_eq!(cfg.model.input_size, 320);
    assert_eq!(cfg.model.max_detections, 20);
    assert_eq!(cfg.model.score_threshold, 0.4);
    // Env wins over the file.
    assert_eq!(cfg.camera.target_fps, 12);
    assert_eq!(cfg.camera.width, 1280);
    assert_eq!(cfg.alert.classes, vec!["person", "stop sign"]);
    assert_eq!(cfg.alert.min_confidence, 0.6);
}

#[test]
fn rejects_invalid_values() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("DRIVEWATCH_TARGET_FPS", "0");
    assert!(PipelineConfig::load().is_err());
    clear_env();

    std::env::set_var("DRIVEWATCH_SCORE_THRESHOLD", "1.5");
    assert!(PipelineConfig::load().is_err());
    clear_env();

    std::env::set_var("DRIVEWATCH_ALERT_CONFIDENCE", "not-a-number");
    assert!(PipelineConfig::load().is_err());
    clear_env();
}
