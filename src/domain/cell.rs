// Column value (cell) model: the single output type of every column resolver
use super::age_color::AgeColorRange;

/// Placeholder used when neither the column nor the context configures one.
pub const DEFAULT_BLANK_FILLER: &str = "--";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub url: String,
    pub target: Option<String>,
}

/// One (row, column) cell.
///
/// Built with consuming setters, so a cell cannot change once it has been
/// handed over. Renderers may ignore any of the annotations (CSV ignores
/// colors and links).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnValue {
    text: Option<String>,
    blank_filler: Option<String>,
    sort_key: Option<f64>,
    foreground: Option<String>,
    background: Option<String>,
    link: Option<Link>,
    image_url: Option<String>,
}

fn non_blank(s: impl Into<String>) -> Option<String> {
    let s = s.into();
    (!s.trim().is_empty()).then_some(s)
}

impl ColumnValue {
    pub fn new(text: impl Into<String>) -> Self {
        Self::default().with_value(text)
    }

    /// A cell with no text; it displays the blank filler.
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_sort_key(mut self, key: impl Into<f64>) -> Self {
        self.sort_key = Some(key.into());
        self
    }

    pub fn with_foreground(mut self, color: impl Into<String>) -> Self {
        self.foreground = non_blank(color);
        self
    }

    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background = non_blank(color);
        self
    }

    pub fn with_link(mut self, url: impl Into<String>, target: Option<&str>) -> Self {
        self.link = non_blank(url).map(|url| Link {
            url,
            target: target.and_then(|t| non_blank(t)),
        });
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = non_blank(url);
        self
    }

    /// Applies an age band as foreground color. An explicit foreground wins.
    pub fn with_age_color(self, band: Option<&AgeColorRange>) -> Self {
        match band {
            Some(band) if self.foreground.is_none() => self.with_foreground(band.color.clone()),
            _ => self,
        }
    }

    pub(crate) fn with_blank_filler(mut self, filler: &str) -> Self {
        self.blank_filler = Some(filler.to_string());
        self
    }

    /// Display text; falls back to the blank filler when no text was set.
    pub fn value(&self) -> &str {
        match self.text.as_deref() {
            Some(text) if !text.trim().is_empty() => text,
            _ => self.blank_filler.as_deref().unwrap_or(DEFAULT_BLANK_FILLER),
        }
    }

    /// True when the cell has no text of its own.
    pub fn is_blank(&self) -> bool {
        self.text.as_deref().is_none_or(|t| t.trim().is_empty())
    }

    pub fn sort_key(&self) -> Option<f64> {
        self.sort_key
    }

    pub fn foreground(&self) -> Option<&str> {
        self.foreground.as_deref()
    }

    pub fn background(&self) -> Option<&str> {
        self.background.as_deref()
    }

    pub fn link(&self) -> Option<&Link> {
        self.link.as_ref()
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }
}

impl From<String> for ColumnValue {
    fn from(text: String) -> Self {
        ColumnValue::new(text)
    }
}

impl From<&str> for ColumnValue {
    fn from(text: &str) -> Self {
        ColumnValue::new(text)
    }
}
