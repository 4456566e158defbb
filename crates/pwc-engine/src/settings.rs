//! Per-channel settings and the named-update contract.
//!
//! Settings are updated one name at a time from a JSON value, as they
//! arrive from the chat or HTTP layer. An update may require a one-time
//! change to the channel's solve state; that is reported as a
//! [`SettingEffect`] and left to the caller, so persisting the settings and
//! persisting the state can fail independently.
//!
//! ```
//! use pwc_engine::crossword::Settings;
//! use pwc_engine::{SettingEffect, Settings as _};
//! use serde_json::json;
//!
//! let mut settings = Settings::default();
//! let effect = settings.update("only_allow_correct_answers", &json!(true)).unwrap();
//! assert_eq!(effect, SettingEffect::ClearIncorrectCells);
//! assert!(settings.update("clue_font_size", &json!(12)).is_err());
//! ```

use crate::error::EngineError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// State change required after a setting update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingEffect {
    None,
    /// Correct-only mode was enabled; wrong cells must go.
    ClearIncorrectCells,
    /// Unofficial answers were disallowed; found unofficial words must go.
    ClearUnofficialAnswers,
    /// Unofficial answers were allowed; found-word indexes shift.
    ReindexAnswers,
}

/// Named-update interface implemented by each kind's settings.
pub trait Settings:
    Default + Clone + PartialEq + std::fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Setting names accepted by [`update`](Self::update).
    const NAMES: &'static [&'static str];

    /// Applies one named setting.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownSetting`] for a name not in [`NAMES`](Self::NAMES),
    /// [`EngineError::InvalidSettingValue`] for a value of the wrong type.
    fn update(&mut self, name: &str, value: &Value) -> Result<SettingEffect, EngineError>;
}

/// Decodes a setting value, mapping failures to [`EngineError::InvalidSettingValue`].
pub(crate) fn decode<T: DeserializeOwned>(name: &str, value: &Value) -> Result<T, EngineError> {
    T::deserialize(value).map_err(|e| EngineError::invalid_setting_value(name, e))
}

/// Text size used when rendering clues or words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    #[default]
    Normal,
    Large,
    #[serde(rename = "xlarge")]
    XLarge,
}

/// Which crossword clue lists viewers see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClueVisibility {
    #[default]
    All,
    Across,
    Down,
    None,
}
