// Requested report column: key, argument and optional overrides
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportColumn {
    pub key: String,
    #[serde(default)]
    pub arg: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub blank_filler: Option<String>,
}

impl ReportColumn {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            arg: String::new(),
            title: None,
            blank_filler: None,
        }
    }

    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.arg = arg.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_blank_filler(mut self, filler: impl Into<String>) -> Self {
        self.blank_filler = Some(filler.into());
        self
    }

    /// Parses the compact `key` or `key:arg` form used in report definitions.
    pub fn parse(text: &str) -> Self {
        match text.trim().split_once(':') {
            Some((key, arg)) => Self::new(key.trim()).with_arg(arg.trim()),
            None => Self::new(text.trim()),
        }
    }

    pub fn title_override(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.trim().is_empty())
    }
}
