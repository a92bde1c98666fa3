//! Editor context for the focused text field.
//!
//! `EditorInfo` is a plain data struct the host fills in when a text field
//! gains focus. The composer derives from it whether prediction and
//! auto-space apply to the field.

/// Input purpose hint for context-aware input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputPurpose {
    /// Free-form text input (default)
    #[default]
    FreeForm,
    /// Email address
    Email,
    /// URL
    Url,
    /// Password (disable suggestions)
    Password,
    /// Number input
    Number,
    /// Phone number
    Phone,
    /// Terminal/command line
    Terminal,
}

impl InputPurpose {
    /// Whether words typed in this kind of field should be predicted.
    pub fn allows_prediction(self) -> bool {
        matches!(self, InputPurpose::FreeForm)
    }

    /// Whether a space may be inserted after a picked suggestion.
    pub fn allows_auto_space(self) -> bool {
        !matches!(self, InputPurpose::Email | InputPurpose::Url)
    }
}

/// Description of the focused text field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditorInfo {
    /// What kind of text the field expects
    pub purpose: InputPurpose,

    /// The host re-attached to the same field (e.g. after a configuration
    /// change) instead of focusing a new one
    pub restarting: bool,
}

impl EditorInfo {
    pub fn new(purpose: InputPurpose) -> Self {
        Self {
            purpose,
            restarting: false,
        }
    }

    pub fn restarting(mut self) -> Self {
        self.restarting = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_free_form_predicts() {
        assert!(InputPurpose::FreeForm.allows_prediction());
        for purpose in [
            InputPurpose::Email,
            InputPurpose::Url,
            InputPurpose::Password,
            InputPurpose::Number,
            InputPurpose::Phone,
            InputPurpose::Terminal,
        ] {
            assert!(!purpose.allows_prediction(), "{:?}", purpose);
        }
    }

    #[test]
    fn email_and_url_skip_auto_space() {
        assert!(!InputPurpose::Email.allows_auto_space());
        assert!(!InputPurpose::Url.allows_auto_space());
        assert!(InputPurpose::FreeForm.allows_auto_space());
    }

    #[test]
    fn builder_marks_restart() {
        let info = EditorInfo::new(InputPurpose::Email).restarting();
        assert!(info.restarting);
        assert_eq!(info.purpose, InputPurpose::Email);
    }
}
