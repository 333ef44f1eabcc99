use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_LABELS_PATH: &str = "labels.txt";
const DEFAULT_MODEL_PATH: &str = "model.onnx";
const DEFAULT_INPUT_SIZE: u32 = 300;
const DEFAULT_MAX_DETECTIONS: usize = 10;
const DEFAULT_SCORE_THRESHOLD: f32 = 0.5;
const DEFAULT_TARGET_FPS: u32 = 15;
const DEFAULT_CAMERA_WIDTH: u32 = 640;
const DEFAULT_CAMERA_HEIGHT: u32 = 480;
const DEFAULT_ALERT_CONFIDENCE: f32 = 0.7;
const DEFAULT_ALERT_CLASSES: [&str; 3] = ["person", "traffic light", "stop sign"];

#[derive(Debug, Deserialize, Default)]
struct PipelineConfigFile {
    labels_path: Option<String>,
    model: Option<ModelConfigFile>,
    camera: Option<CameraConfigFile>,
    alert: Option<AlertConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct ModelConfigFile {
    path: Option<String>,
    input_size: Option<u32>,
    max_detections: Option<usize>,
    score_threshold: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
struct CameraConfigFile {
    target_fps: Option<u32>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
struct AlertConfigFile {
    classes: Option<Vec<String>>,
    min_confidence: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub labels_path: String,
    pub model: ModelSettings,
    pub camera: CameraSettings,
    pub alert: AlertSettings,
}

#[derive(Debug, Clone)]
pub struct ModelSettings {
    pub path: String,
    pub input_size: u32,
    pub max_detections: usize,
    pub score_threshold: f32,
}

#[derive(Debug, Clone)]
pub struct CameraSettings {
    pub target_fps: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone)]
pub struct AlertSettings {
    pub classes: Vec<String>,
    pub min_confidence: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from_file(PipelineConfigFile::default())
    }
}

impl PipelineConfig {
    /// Load configuration: JSON file named by `DRIVEWATCH_CONFIG` (when set),
    /// then env-var overrides, then validation.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("DRIVEWATCH_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: PipelineConfigFile) -> Self {
        let labels_path = file
            .labels_path
            .unwrap_or_else(|| DEFAULT_LABELS_PATH.to_string());
        let model = ModelSettings {
            path: file
                .model
                .as_ref()
                .and_then(|model| model.path.clone())
                .unwrap_or_else(|| DEFAULT_MODEL_PATH.to_string()),
            input_size: file
                .model
                .as_ref()
                .and_then(|model| model.input_size)
                .unwrap_or(DEFAULT_INPUT_SIZE),
            max_detections: file
                .model
                .as_ref()
                .and_then(|model| model.max_detections)
                .unwrap_or(DEFAULT_MAX_DETECTIONS),
            score_threshold: file
                .model
                .as_ref()
                .and_then(|model| model.score_threshold)
                .unwrap_or(DEFAULT_SCORE_THRESHOLD),
        };
        let camera = CameraSettings {
            target_fps: file
                .camera
                .as_ref()
                .and_then(|camera| camera.target_fps)
                .unwrap_or(DEFAULT_TARGET_FPS),
            width: file
                .camera
                .as_ref()
                .and_then(|camera| camera.width)
                .unwrap_or(DEFAULT_CAMERA_WIDTH),
            height: file
                .camera
                .as_ref()
                .and_then(|camera| camera.height)
                .unwrap_or(DEFAULT_CAMERA_HEIGHT),
        };
        let alert = AlertSettings {
            classes: file
                .alert
                .as_ref()
                .and_then(|alert| alert.classes.clone())
                .unwrap_or_else(|| {
                    DEFAULT_ALERT_CLASSES
                        .iter()
                        .map(|s| s.to_string())
                        .collect()
                }),
            min_confidence: file
                .alert
                .and_then(|alert| alert.min_confidence)
                .unwrap_or(DEFAULT_ALERT_CONFIDENCE),
        };
        Self {
            labels_path,
            model,
            camera,
            alert,
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(path) = std::env::var("DRIVEWATCH_LABELS") {
            if !path.trim().is_empty() {
                self.labels_path = path;
            }
        }
        if let Ok(path) = std::env::var("DRIVEWATCH_MODEL") {
            if !path.trim().is_empty() {
                self.model.path = path;
            }
        }
        if let Ok(fps) = std::env::var("DRIVEWATCH_TARGET_FPS") {
            self.camera.target_fps = fps
                .parse()
                .map_err(|_| anyhow!("DRIVEWATCH_TARGET_FPS must be an integer"))?;
        }
        if let Ok(threshold) = std::env::var("DRIVEWATCH_SCORE_THRESHOLD") {
            self.model.score_threshold = threshold
                .parse()
                .map_err(|_| anyhow!("DRIVEWATCH_SCORE_THRESHOLD must be a float"))?;
        }
        if let Ok(classes) = std::env::var("DRIVEWATCH_ALERT_CLASSES") {
            let parsed = split_csv(&classes);
            if !parsed.is_empty() {
                self.alert.classes = parsed;
            }
        }
        if let Ok(confidence) = std::env::var("DRIVEWATCH_ALERT_CONFIDENCE") {
            self.alert.min_confidence = confidence
                .parse()
                .map_err(|_| anyhow!("DRIVEWATCH_ALERT_CONFIDENCE must be a float"))?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.camera.target_fps == 0 {
            return Err(anyhow!("camera.target_fps must be at least 1"));
        }
        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(anyhow!("camera dimensions must be non-zero"));
        }
        if self.model.input_size == 0 {
            return Err(anyhow!("model.input_size must be at least 1"));
        }
        if self.model.max_detections == 0 {
            return Err(anyhow!("model.max_detections must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.model.score_threshold) {
            return Err(anyhow!("model.score_threshold must be within [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.alert.min_confidence) {
            return Err(anyhow!("alert.min_confidence must be within [0, 1]"));
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<PipelineConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .map(|entry| entry.to_string())
        .collect()
}
