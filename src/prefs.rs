use std::path::{Path, PathBuf};

/// Read only access to the user preferences
pub trait ReadOnlyUserPrefs {
    fn gui_settings(&self) -> &GuiSettings;

    fn pay_back_file_path(&self) -> &Path;
}

/// Window size and position of the last session
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GuiSettings {
    pub window_width: u32,
    pub window_height: u32,
    pub window_x: Option<i32>,
    pub window_y: Option<i32>,
}

impl Default for GuiSettings {
    fn default() -> Self {
        Self {
            window_width: 740,
            window_height: 600,
            window_x: None,
            window_y: None,
        }
    }
}

/// Settings that outlive a session
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserPrefs {
    gui_settings: GuiSettings,
    pay_back_file_path: PathBuf,
}

impl UserPrefs {
    /// Creates a copy of `prefs`
    pub fn from_read_only(prefs: &dyn ReadOnlyUserPrefs) -> Self {
        Self {
            gui_settings: prefs.gui_settings().clone(),
            pay_back_file_path: prefs.pay_back_file_path().to_path_buf(),
        }
    }

    /// Replaces all settings by a copy of `prefs`
    pub fn reset_data(&mut self, prefs: &dyn ReadOnlyUserPrefs) {
        *self = Self::from_read_only(prefs);
    }

    pub fn set_gui_settings(&mut self, gui_settings: GuiSettings) {
        self.gui_settings = gui_settings;
    }

    pub fn set_pay_back_file_path(&mut self, path: PathBuf) {
        self.pay_back_file_path = path;
    }
}

impl Default for UserPrefs {
    fn default() -> Self {
        Self {
            gui_settings: GuiSettings::default(),
            pay_back_file_path: PathBuf::from("data").join("payback.json"),
        }
    }
}

impl ReadOnlyUserPrefs for UserPrefs {
    fn gui_settings(&self) -> &GuiSettings {
        &self.gui_settings
    }

    fn pay_back_file_path(&self) -> &Path {
        &self.pay_back_file_path
    }
}
