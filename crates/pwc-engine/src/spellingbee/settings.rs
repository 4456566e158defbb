//! Spelling-bee settings.

use crate::error::EngineError;
use crate::settings::{decode, FontSize, SettingEffect};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Accept words from the unofficial list.
    pub allow_unofficial_answers: bool,
    pub font_size: FontSize,
    pub show_answer_placeholders: bool,
}

impl crate::settings::Settings for Settings {
    const NAMES: &'static [&'static str] = &[
        "allow_unofficial_answers",
        "font_size",
        "show_answer_placeholders",
    ];

    fn update(&mut self, name: &str, value: &Value) -> Result<SettingEffect, EngineError> {
        match name {
            "allow_unofficial_answers" => {
                self.allow_unofficial_answers = decode(name, value)?;
                Ok(if self.allow_unofficial_answers {
                    SettingEffect::ReindexAnswers
                } else {
                    SettingEffect::ClearUnofficialAnswers
                })
            }
            "font_size" => {
                self.font_size = decode(name, value)?;
                Ok(SettingEffect::None)
            }
            "show_answer_placeholders" => {
                self.show_answer_placeholders = decode(name, value)?;
                Ok(SettingEffect::None)
            }
            _ => Err(EngineError::UnknownSetting(name.to_string())),
        }
    }
}
