use anyhow::Result;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;

/// Fills in missing options, asking the user only when someone is at the terminal.
pub(crate) struct Prompter {
    interactive: bool,
}

impl Prompter {
    pub(crate) fn new(no_input: bool) -> Self {
        Self {
            interactive: !no_input && console::user_attended(),
        }
    }

    /// Return `current` when set and non-empty, otherwise ask (or fall back to `default`).
    pub(crate) fn value(
        &self,
        current: Option<String>,
        message: &str,
        default: &str,
    ) -> Result<String> {
        if let Some(value) = current.filter(|v| !v.is_empty()) {
            return Ok(value);
        }
        if !self.interactive {
            return Ok(default.to_string());
        }

        let theme = ColorfulTheme::default();
        let mut input = Input::<String>::with_theme(&theme)
            .with_prompt(message)
            .allow_empty(true);
        if !default.is_empty() {
            input = input.default(default.to_string());
        }
        Ok(input.interact_text()?)
    }
}
