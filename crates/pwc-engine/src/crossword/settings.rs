//! Crossword settings.

use crate::error::EngineError;
use crate::settings::{decode, ClueVisibility, FontSize, SettingEffect};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Reject answers that would put a wrong letter in the grid.
    pub only_allow_correct_answers: bool,
    pub clues_to_show: ClueVisibility,
    pub clue_font_size: FontSize,
    pub show_notes: bool,
}

impl crate::settings::Settings for Settings {
    const NAMES: &'static [&'static str] = &[
        "only_allow_correct_answers",
        "clues_to_show",
        "clue_font_size",
        "show_notes",
    ];

    fn update(&mut self, name: &str, value: &Value) -> Result<SettingEffect, EngineError> {
        match name {
            "only_allow_correct_answers" => {
                let enabled: bool = decode(name, value)?;
                self.only_allow_correct_answers = enabled;
                Ok(if enabled {
                    SettingEffect::ClearIncorrectCells
                } else {
                    SettingEffect::None
                })
            }
            "clues_to_show" => {
                self.clues_to_show = decode(name, value)?;
                Ok(SettingEffect::None)
            }
            "clue_font_size" => {
                self.clue_font_size = decode(name, value)?;
                Ok(SettingEffect::None)
            }
            "show_notes" => {
                self.show_notes = decode(name, value)?;
                Ok(SettingEffect::None)
            }
            _ => Err(EngineError::UnknownSetting(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings as _;
    use serde_json::json;

    #[test]
    fn enabling_correct_only_requires_clearing() {
        let mut settings = Settings::default();
        assert_eq!(
            settings.update("only_allow_correct_answers", &json!(true)).unwrap(),
            SettingEffect::ClearIncorrectCells
        );
        assert!(settings.only_allow_correct_answers);
        assert_eq!(
            settings.update("only_allow_correct_answers", &json!(false)).unwrap(),
            SettingEffect::None
        );
    }

    #[test]
    fn updates_each_named_setting() {
        let mut settings = Settings::default();
        settings.update("clues_to_show", &json!("down")).unwrap();
        settings.update("clue_font_size", &json!("xlarge")).unwrap();
        settings.update("show_notes", &json!(true)).unwrap();
        assert_eq!(
            settings,
            Settings {
                only_allow_correct_answers: false,
                clues_to_show: ClueVisibility::Down,
                clue_font_size: FontSize::XLarge,
                show_notes: true,
            }
        );
    }

    #[test]
    fn rejects_unknown_name_and_bad_value() {
        let mut settings = Settings::default();
        assert_eq!(
            settings.update("font_size", &json!("large")),
            Err(EngineError::UnknownSetting("font_size".into()))
        );
        let err = settings.update("show_notes", &json!("yes")).unwrap_err();
        assert!(matches!(err, EngineError::InvalidSettingValue { .. }));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_value(json!({"show_notes": true})).unwrap();
        assert!(settings.show_notes);
        assert_eq!(settings.clues_to_show, ClueVisibility::All);
    }
}
