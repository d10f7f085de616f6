use crate::{
    messaging::types::{InlineButton, InlineKeyboard},
    texts,
};

/// Inline button actions, encoded as callback data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    AboutCommunity,
    AboutPsychologist,
    CheckResponse,
    WriteProblem,
    BackToMain,
}

impl MenuAction {
    pub fn callback_data(self) -> &'static str {
        match self {
            MenuAction::AboutCommunity => "about_community",
            MenuAction::AboutPsychologist => "about_psychologist",
            MenuAction::CheckResponse => "check_response",
            MenuAction::WriteProblem => "write_problem",
            MenuAction::BackToMain => "back_to_main",
        }
    }

    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "about_community" => Some(MenuAction::AboutCommunity),
            "about_psychologist" => Some(MenuAction::AboutPsychologist),
            "check_response" => Some(MenuAction::CheckResponse),
            "write_problem" => Some(MenuAction::WriteProblem),
            "back_to_main" => Some(MenuAction::BackToMain),
            _ => None,
        }
    }

    fn button(self, label: &str) -> InlineButton {
        InlineButton::new(label, self.callback_data())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Main,
    AboutCommunity,
    AboutPsychologist,
    WriteProblem,
}

impl Screen {
    pub fn html(self) -> &'static str {
        match self {
            Screen::Main => texts::START_MESSAGE,
            Screen::AboutCommunity => texts::ABOUT_COMMUNITY,
            Screen::AboutPsychologist => texts::ABOUT_PSYCHOLOGIST,
            Screen::WriteProblem => texts::WRITE_PROBLEM,
        }
    }

    pub fn keyboard(self) -> InlineKeyboard {
        match self {
            Screen::Main => InlineKeyboard::new(vec![
                vec![
                    MenuAction::AboutCommunity.button(texts::BUTTON_ABOUT_COMMUNITY),
                    MenuAction::AboutPsychologist.button(texts::BUTTON_ABOUT_PSYCHOLOGIST),
                ],
                vec![
                    MenuAction::CheckResponse.button(texts::BUTTON_CHECK_RESPONSE),
                    MenuAction::WriteProblem.button(texts::BUTTON_WRITE_PROBLEM),
                ],
            ]),
            Screen::AboutCommunity | Screen::AboutPsychologist | Screen::WriteProblem => {
                InlineKeyboard::new(vec![vec![MenuAction::BackToMain.button(texts::BUTTON_BACK)]])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_button_parses_back_to_its_action() {
        for screen in [
            Screen::Main,
            Screen::AboutCommunity,
            Screen::AboutPsychologist,
            Screen::WriteProblem,
        ] {
            for b in screen.keyboard().buttons() {
                let action = MenuAction::parse(&b.callback_data).unwrap();
                assert_eq!(action.callback_data(), b.callback_data);
            }
        }
    }

    #[test]
    fn main_menu_is_two_by_two() {
        let kb = Screen::Main.keyboard();
        assert_eq!(kb.rows.len(), 2);
        assert!(kb.rows.iter().all(|r| r.len() == 2));
    }

    #[test]
    fn unknown_callback_data_is_rejected() {
        assert_eq!(MenuAction::parse("askuser:1:0"), None);
    }
}
