//! Acrostic settings.

use crate::error::EngineError;
use crate::settings::{decode, FontSize, SettingEffect};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub only_allow_correct_answers: bool,
    pub clue_font_size: FontSize,
}

impl crate::settings::Settings for Settings {
    const NAMES: &'static [&'static str] = &["only_allow_correct_answers", "clue_font_size"];

    fn update(&mut self, name: &str, value: &Value) -> Result<SettingEffect, EngineError> {
        match name {
            "only_allow_correct_answers" => {
                self.only_allow_correct_answers = decode(name, value)?;
                Ok(if self.only_allow_correct_answers {
                    SettingEffect::ClearIncorrectCells
                } else {
                    SettingEffect::None
                })
            }
            "clue_font_size" => {
                self.clue_font_size = decode(name, value)?;
                Ok(SettingEffect::None)
            }
            _ => Err(EngineError::UnknownSetting(name.to_string())),
        }
    }
}
