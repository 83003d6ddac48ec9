use palwheel_core::WheelConfig;

const DOCUMENTATION: &str = r#"# Palwheel settings. You may edit this file, but be aware that formatting and comments will not
# be preserved. Any field left out keeps its default.

# Sizes are in egui points. `sample_interval_ms` limits how often the screen is read while
# picking, and `preview_offset` is how far the preview sits from the cursor, in screen pixels.

"#;

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings: {0}")]
    Parse(#[from] toml::de::Error),
}

#[must_use]
pub fn preferences_dir() -> Option<std::path::PathBuf> {
    let mut base_dir = dirs::preference_dir()?;
    base_dir.push(env!("CARGO_PKG_NAME"));
    Some(base_dir)
}

pub struct Settings {
    load_error: Option<SettingsError>,
    pub config: WheelConfig,
}
impl Settings {
    const FILENAME: &'static str = "wheel.toml";
    /// Shared global settings, loaded from user preferences.
    /// (Or defaulted, if unavailable for some reason)
    #[must_use]
    pub fn get() -> &'static Self {
        static GLOBAL_SETTINGS: std::sync::OnceLock<Settings> = std::sync::OnceLock::new();

        GLOBAL_SETTINGS.get_or_init(|| {
            let mut dir = preferences_dir();
            match dir.as_mut() {
                None => Self::no_path(),
                Some(dir) => {
                    dir.push(Self::FILENAME);
                    Self::load_or_default(dir)
                }
            }
        })
    }
    #[must_use]
    pub fn no_path() -> Self {
        log::warn!("Preferences dir wasn't available, using default wheel settings.");
        Self {
            load_error: None,
            config: WheelConfig::default(),
        }
    }
    #[must_use]
    fn load_or_default(path: &std::path::Path) -> Self {
        let config: Result<WheelConfig, SettingsError> = try_block::try_block! {
            let string = std::fs::read_to_string(path)?;
            Ok(Self::parse(&string)?)
        };

        match config {
            Ok(config) => Self {
                load_error: None,
                config,
            },
            // Nothing saved yet is the usual case, not a failure.
            Err(SettingsError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => Self {
                load_error: None,
                config: WheelConfig::default(),
            },
            Err(err) => {
                log::warn!("{}: {err}, using defaults", path.display());
                Self {
                    load_error: Some(err),
                    config: WheelConfig::default(),
                }
            }
        }
    }
    pub fn parse(string: &str) -> Result<WheelConfig, SettingsError> {
        Ok(toml::from_str(string)?)
    }
    /// The error that caused defaults to be used, if any. Useful for displaying a warning.
    #[must_use]
    pub fn load_error(&self) -> Option<&SettingsError> {
        self.load_error.as_ref()
    }
    pub fn save(&self) -> anyhow::Result<()> {
        let mut preferences =
            preferences_dir().ok_or_else(|| anyhow::anyhow!("No preferences dir found"))?;
        // Not recursive. If the parent is missing, the user probably has a good reason.
        let _ = std::fs::DirBuilder::new().create(&preferences);

        preferences.push(Self::FILENAME);
        std::fs::write(preferences, Self::document(&self.config)?)?;
        Ok(())
    }
    fn document(config: &WheelConfig) -> anyhow::Result<String> {
        let string = toml::ser::to_string_pretty(config)?;
        Ok(DOCUMENTATION.to_owned() + &string)
    }
}
