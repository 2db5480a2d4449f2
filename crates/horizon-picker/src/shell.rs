//! Dialog presets shared by the application shell.
//!
//! Screens that host pickers confirm and report through three alert styles.
//! The presets are plain option tables handed to the host's dialog
//! component; nothing here renders a dialog.

use serde::Serialize;

/// Option table for an alert dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertPreset {
    /// Classes on the header.
    pub header_class: &'static str,
    /// Classes on the footer holding the buttons.
    pub footer_class: &'static str,
    /// Button variant of the confirming button.
    pub ok_variant: &'static str,
    /// Button variant of the second button, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_variant: Option<&'static str>,
    /// Label of the confirming button.
    pub ok_title: &'static str,
    /// Label of the second button. Without one the dialog has a single button.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_title: Option<&'static str>,
    /// Classes on the modal itself.
    pub modal_class: &'static str,
}

impl AlertPreset {
    /// Continue / discard confirmation.
    pub const CONFIRM: AlertPreset = AlertPreset {
        header_class: "border-bottom-0",
        footer_class: "border-top-0 btn-group pt-0",
        ok_variant: "primary btn-continue",
        cancel_variant: Some("primary btn-discard"),
        ok_title: "Continue",
        cancel_title: Some("Discard"),
        modal_class: "jerp-alert-modal confirm",
    };

    /// Single-button success notice.
    pub const SUCCESS: AlertPreset = AlertPreset {
        header_class: "border-bottom-0",
        footer_class: "border-top-0 btn-group pt-0 d-flex justify-content-center",
        ok_variant: "primary btn-continue",
        cancel_variant: None,
        ok_title: "Done",
        cancel_title: None,
        modal_class: "jerp-alert-modal success",
    };

    /// Single-button error notice.
    pub const ERROR: AlertPreset = AlertPreset {
        header_class: "border-bottom-0",
        footer_class: "border-top-0 btn-group pt-0 d-flex justify-content-center",
        ok_variant: "primary btn-continue",
        cancel_variant: None,
        ok_title: "Try Again",
        cancel_title: None,
        modal_class: "jerp-alert-modal error",
    };

    /// Whether the dialog offers a second button.
    pub fn has_cancel(&self) -> bool {
        self.cancel_title.is_some()
    }
}

/// Content of an alert dialog body: a material icon name, a title and a
/// message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertBody {
    /// Material icon name.
    pub icon: String,
    /// Heading line.
    pub title: String,
    /// Explanatory text under the heading.
    pub message: String,
}

impl AlertBody {
    /// Build a body. The icon comes last, as most call sites pass a default.
    pub fn new(title: impl Into<String>, message: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            icon: icon.into(),
            title: title.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_confirm_serializes_camel_case() {
        let value = serde_json::to_value(AlertPreset::CONFIRM).unwrap();
        assert_eq!(
            value,
            json!({
                "headerClass": "border-bottom-0",
                "footerClass": "border-top-0 btn-group pt-0",
                "okVariant": "primary btn-continue",
                "cancelVariant": "primary btn-discard",
                "okTitle": "Continue",
                "cancelTitle": "Discard",
                "modalClass": "jerp-alert-modal confirm",
            })
        );
    }

    #[test]
    fn test_notices_have_one_button() {
        for preset in [AlertPreset::SUCCESS, AlertPreset::ERROR] {
            assert!(!preset.has_cancel());
            let value = serde_json::to_value(preset).unwrap();
            assert!(value.get("cancelTitle").is_none());
        }
        assert!(AlertPreset::CONFIRM.has_cancel());
    }

    #[test]
    fn test_alert_body() {
        let body = AlertBody::new("Saved", "The leave request was submitted.", "check_circle");
        assert_eq!(body.icon, "check_circle");
        assert_eq!(
            serde_json::to_value(&body).unwrap()["title"],
            json!("Saved")
        );
    }
}
