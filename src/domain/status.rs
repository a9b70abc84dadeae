// Status code presentation
use serde::Deserialize;

/// Description and colors for one status code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StatusStyle {
    pub description: String,
    pub foreground: Option<String>,
    pub background: Option<String>,
}

impl StatusStyle {
    pub fn has_colors(&self) -> bool {
        let set = |c: &Option<String>| c.as_deref().is_some_and(|c| !c.trim().is_empty());
        set(&self.foreground) || set(&self.background)
    }
}

/// `0xF020` style, four hex digits minimum.
pub fn hex_status_code(code: u32) -> String {
    format!("0x{code:04X}")
}

/// Column argument for status columns: `dec*` selects decimal, `noColor`
/// suppresses colors. Anything containing "color" keeps colors on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusArg {
    pub decimal: bool,
    pub colored: bool,
}

impl StatusArg {
    pub fn parse(arg: &str) -> Self {
        let arg = arg.trim().to_ascii_lowercase();
        let colored = arg.is_empty() || (arg.contains("color") && !arg.starts_with("no"));
        Self {
            decimal: arg.starts_with("dec"),
            colored,
        }
    }

    pub fn format_code(self, code: u32) -> String {
        if self.decimal {
            code.to_string()
        } else {
            hex_status_code(code)
        }
    }
}
