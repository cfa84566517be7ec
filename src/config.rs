//! Engine configuration.
//!
//! Settings are loaded from an INI file. Missing keys keep their defaults,
//! so the engine always starts with something sensible.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! title = layered2d
//! width = 1200
//! height = 675
//! ; when both aspect values are set, the window size is derived from the
//! ; control axis value (width or height) and the ratio
//! aspect_width = 16
//! aspect_height = 9
//! control_axis = width
//! hide_cursor = false
//!
//! [engine]
//! max_tps = 60
//!
//! [stats]
//! enabled = true
//! font = assets/fonts/mono.ttf
//! size = 20
//! ; hex rgb or rgba, written without a leading '#'
//! color = ffffff
//! ```

use std::path::{Path, PathBuf};

use configparser::ini::Ini;
use log::{info, warn};

use crate::backend::surface::Color;
use crate::error::EngineError;
use crate::geometry::{AspectRatio, ControlAxis, Dimensions};

const DEFAULT_TITLE: &str = "layered2d";
const DEFAULT_WIDTH: f64 = 1200.0;
const DEFAULT_HEIGHT: f64 = 675.0;
const DEFAULT_MAX_TPS: u32 = 60;
const DEFAULT_STATS_SIZE: f64 = 20.0;
const DEFAULT_CONFIG_PATH: &str = "./layered2d.ini";

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub title: String,
    pub width: f64,
    pub height: f64,
    /// Window ratio; overrides whichever of width/height is not the control axis.
    pub aspect: Option<AspectRatio>,
    pub hide_cursor: bool,
    pub max_tps: u32,
    pub stats_enabled: bool,
    pub stats_font: String,
    pub stats_size: f64,
    pub stats_color: Color,
    pub config_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            aspect: None,
            hide_cursor: false,
            max_tps: DEFAULT_MAX_TPS,
            stats_enabled: false,
            stats_font: String::new(),
            stats_size: DEFAULT_STATS_SIZE,
            stats_color: Color::WHITE,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Window size, taking the aspect ratio into account.
    pub fn dimensions(&self) -> Dimensions {
        match self.aspect {
            Some(ratio) => match ratio.control_axis {
                ControlAxis::Width => ratio.new_dimensions(self.width),
                ControlAxis::Height => ratio.new_dimensions(self.height),
            },
            None => Dimensions::new(self.width, self.height),
        }
    }

    /// Load settings from `config_path`. Missing values keep their current
    /// values; an unreadable file or a malformed value is an error.
    pub fn load_from_file(&mut self) -> Result<(), EngineError> {
        let mut ini = Ini::new();
        ini.load(&self.config_path).map_err(|e| {
            EngineError::Config(format!(
                "failed to load {}: {e}",
                self.config_path.display()
            ))
        })?;

        // [window]
        if let Some(title) = ini.get("window", "title") {
            self.title = title;
        }
        if let Some(width) = get_float(&ini, "window", "width")? {
            self.width = width;
        }
        if let Some(height) = get_float(&ini, "window", "height")? {
            self.height = height;
        }
        let aspect_width = get_float(&ini, "window", "aspect_width")?;
        let aspect_height = get_float(&ini, "window", "aspect_height")?;
        let control_axis = match ini.get("window", "control_axis").as_deref() {
            None | Some("width") => ControlAxis::Width,
            Some("height") => ControlAxis::Height,
            Some(other) => {
                return Err(EngineError::Config(format!(
                    "window.control_axis must be 'width' or 'height', got '{other}'"
                )));
            }
        };
        if let (Some(w), Some(h)) = (aspect_width, aspect_height) {
            if w <= 0.0 || h <= 0.0 {
                return Err(EngineError::Config(format!(
                    "aspect ratio {w}:{h} must be positive"
                )));
            }
            self.aspect = Some(AspectRatio::new(w, h, control_axis));
        }
        if let Some(hide) = get_bool(&ini, "window", "hide_cursor")? {
            self.hide_cursor = hide;
        }

        // [engine]
        if let Some(tps) = ini
            .getuint("engine", "max_tps")
            .map_err(EngineError::Config)?
        {
            if tps == 0 {
                warn!("engine.max_tps = 0 ignored, keeping {}", self.max_tps);
            } else {
                self.max_tps = u32::try_from(tps).unwrap_or(u32::MAX);
            }
        }

        // [stats]
        if let Some(enabled) = get_bool(&ini, "stats", "enabled")? {
            self.stats_enabled = enabled;
        }
        if let Some(font) = ini.get("stats", "font") {
            self.stats_font = font;
        }
        if let Some(size) = get_float(&ini, "stats", "size")? {
            self.stats_size = size;
        }
        if let Some(color) = ini.get("stats", "color") {
            self.stats_color = Color::from_hex(&color)?;
        }

        let dims = self.dimensions();
        info!(
            "Loaded config: '{}' {}x{}, max_tps={}, stats={}",
            self.title, dims.width, dims.height, self.max_tps, self.stats_enabled
        );
        Ok(())
    }

    /// Load from `path`, falling back to defaults when the file is missing.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let mut config = Self::with_path(path.as_ref());
        if !path.as_ref().exists() {
            info!(
                "No config at {}, using defaults",
                path.as_ref().display()
            );
            return Ok(config);
        }
        config.load_from_file()?;
        Ok(config)
    }

    /// Write the current settings to `config_path`.
    pub fn save_to_file(&self) -> Result<(), EngineError> {
        let mut ini = Ini::new();

        ini.set("window", "title", Some(self.title.clone()));
        ini.set("window", "width", Some(self.width.to_string()));
        ini.set("window", "height", Some(self.height.to_string()));
        if let Some(ratio) = self.aspect {
            ini.set("window", "aspect_width", Some(ratio.ratio.width.to_string()));
            ini.set("window", "aspect_height", Some(ratio.ratio.height.to_string()));
            let axis = match ratio.control_axis {
                ControlAxis::Width => "width",
                ControlAxis::Height => "height",
            };
            ini.set("window", "control_axis", Some(axis.to_string()));
        }
        ini.set("window", "hide_cursor", Some(self.hide_cursor.to_string()));

        ini.set("engine", "max_tps", Some(self.max_tps.to_string()));

        ini.set("stats", "enabled", Some(self.stats_enabled.to_string()));
        ini.set("stats", "font", Some(self.stats_font.clone()));
        ini.set("stats", "size", Some(self.stats_size.to_string()));
        let c = self.stats_color;
        ini.set(
            "stats",
            "color",
            Some(format!("{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a)),
        );

        ini.write(&self.config_path).map_err(|e| {
            EngineError::Config(format!(
                "failed to save {}: {e}",
                self.config_path.display()
            ))
        })?;

        info!("Saved config to {:?}", self.config_path);
        Ok(())
    }
}

fn get_float(ini: &Ini, section: &str, key: &str) -> Result<Option<f64>, EngineError> {
    ini.getfloat(section, key)
        .map_err(|e| EngineError::Config(format!("{section}.{key}: {e}")))
}

fn get_bool(ini: &Ini, section: &str, key: &str) -> Result<Option<bool>, EngineError> {
    ini.getbool(section, key)
        .map_err(|e| EngineError::Config(format!("{section}.{key}: {e}")))
}
