#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderKind {
    Status,
    Loading,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub text: String,
    pub kind: RenderKind,
}

impl RenderRequest {
    pub fn new(text: impl Into<String>, kind: RenderKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

/// Contents of the two render regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub html: String,
    pub spinner_visible: bool,
}

impl Default for StatusView {
    fn default() -> Self {
        Self {
            html: String::new(),
            spinner_visible: true,
        }
    }
}

impl StatusView {
    pub fn status(text: &str, loading: bool) -> Self {
        let html = if loading {
            format!("<p class=\"loading\">{text}</p>")
        } else {
            text.to_owned()
        };
        Self {
            html,
            spinner_visible: true,
        }
    }

    pub fn error(text: &str) -> Self {
        Self {
            html: text.to_owned(),
            spinner_visible: false,
        }
    }
}
