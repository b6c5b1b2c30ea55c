use crate::view::Element;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalState {
    #[default]
    Closed,
    Open,
}

/// Ways a user can ask an open modal to go away
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "via", rename_all = "snake_case")]
pub enum Dismiss {
    CloseButton,
    /// A click that landed on the overlay. Only counts when the overlay itself
    /// was the click target, not the dialog inside it.
    Overlay { target_is_overlay: bool },
    Escape,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct KeyPress {
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub meta: bool,
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn is_escape(&self) -> bool {
        self.key == "Escape"
    }

    /// Ctrl+S, or Cmd+S on a Mac
    pub fn is_save_shortcut(&self) -> bool {
        (self.ctrl || self.meta) && self.key.eq_ignore_ascii_case("s")
    }
}

/// Open/closed state shared by every dialog
#[derive(Debug)]
pub struct Modal {
    name: &'static str,
    state: ModalState,
}

impl Modal {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: ModalState::Closed,
        }
    }

    pub fn state(&self) -> ModalState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ModalState::Open
    }

    pub fn open(&mut self) {
        debug!(modal = self.name, "Opening modal");
        self.state = ModalState::Open;
    }

    pub fn close(&mut self) {
        debug!(modal = self.name, "Closing modal");
        self.state = ModalState::Closed;
    }

    /// Whether this request should close the modal. Closed modals ignore
    /// everything.
    pub fn should_dismiss(&self, dismiss: Dismiss) -> bool {
        self.is_open()
            && match dismiss {
                Dismiss::CloseButton | Dismiss::Escape => true,
                Dismiss::Overlay { target_is_overlay } => target_is_overlay,
            }
    }
}

/// Overlay root plus the dialog header shared by all modals. Body content is
/// added with [ModalShell::child], then [ModalShell::build] produces the region.
pub fn modal_shell(id: &'static str, name: &'static str, open: bool, title: &str) -> ModalShell {
    ModalShell {
        id,
        name,
        open,
        title: title.to_owned(),
        body: Vec::new(),
    }
}

pub struct ModalShell {
    id: &'static str,
    name: &'static str,
    open: bool,
    title: String,
    body: Vec<Element>,
}

impl ModalShell {
    pub fn child(mut self, child: Element) -> Self {
        self.body.push(child);
        self
    }

    pub fn build(self) -> Element {
        let close_url = format!("/api/{}/close", self.name);
        let dialog = Element::new("div")
            .class("modal")
            .child(
                Element::new("div")
                    .class("modal-header")
                    .child(Element::new("h2").text(self.title))
                    .child(
                        Element::new("button")
                            .class("modal-close")
                            .attr("type", "button")
                            .attr("data-post", close_url.as_str())
                            .attr("data-body", json!({ "via": "close_button" }).to_string())
                            .text("×"),
                    ),
            )
            .child(Element::new("div").class("modal-body").children(self.body));

        Element::new("div")
            .id(self.id)
            .class("modal-overlay")
            .class_if(self.open, "active")
            .attr("data-overlay", close_url)
            .child(dialog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_wires_close_controls() {
        let shell = modal_shell("aiModal", "ai", true, "Tips")
            .child(Element::new("p").class("body-text").text("hello"))
            .build();

        assert_eq!(shell.get_attr("id"), Some("aiModal"));
        assert!(shell.has_class("active"));
        assert_eq!(shell.get_attr("data-overlay"), Some("/api/ai/close"));
        let close = shell.find("modal-close").unwrap();
        assert_eq!(close.get_attr("data-post"), Some("/api/ai/close"));
        assert_eq!(shell.find("body-text").unwrap().text_content(), "hello");

        let closed = modal_shell("aiModal", "ai", false, "Tips").build();
        assert!(!closed.has_class("active"));
    }

    #[test]
    fn every_dismissal_closes_an_open_modal() {
        for dismiss in [
            Dismiss::CloseButton,
            Dismiss::Overlay {
                target_is_overlay: true,
            },
            Dismiss::Escape,
        ] {
            let mut modal = Modal::new("test");
            assert!(!modal.should_dismiss(dismiss));
            modal.open();
            assert!(modal.should_dismiss(dismiss));
        }
    }

    #[test]
    fn clicks_inside_the_dialog_do_not_dismiss() {
        let mut modal = Modal::new("test");
        modal.open();
        assert!(!modal.should_dismiss(Dismiss::Overlay {
            target_is_overlay: false
        }));
    }

    #[test]
    fn dismiss_parses_from_json() {
        let overlay: Dismiss =
            serde_json::from_str(r#"{"via":"overlay","target_is_overlay":true}"#).unwrap();
        assert_eq!(
            overlay,
            Dismiss::Overlay {
                target_is_overlay: true
            }
        );
        let button: Dismiss = serde_json::from_str(r#"{"via":"close_button"}"#).unwrap();
        assert_eq!(button, Dismiss::CloseButton);
    }

    #[test]
    fn save_shortcut_needs_modifier() {
        assert!(!KeyPress::new("s").is_save_shortcut());
        let ctrl_s = KeyPress {
            key: "s".into(),
            ctrl: true,
            meta: false,
        };
        assert!(ctrl_s.is_save_shortcut());
        assert!(KeyPress::new("Escape").is_escape());
    }
}
