//! Skill logos and the aggregate preload gate.

/// Neutral `</>` glyph used when a logo is unknown or fails to load.
pub const PLACEHOLDER_ICON: &str = "data:image/svg+xml;base64,PHN2ZyB4bWxucz0iaHR0cDovL3d3dy53My5vcmcvMjAwMC9zdmciIHZpZXdCb3g9IjAgMCA0OCA0OCIgZmlsbD0ibm9uZSIgc3Ryb2tlPSIjMDA3NEU4IiBzdHJva2Utd2lkdGg9IjIiIHN0cm9rZS1saW5lY2FwPSJyb3VuZCIgc3Ryb2tlLWxpbmVqb2luPSJyb3VuZCIgY2xhc3M9Imx1Y2lkZSBsdWNpZGUtY29kZSI+PHBvbHlsaW5lIHBvaW50cz0iMTYgMTggMjIgMTIgMTYgNiI+PC9wb2x5bGluZT48cG9seWxpbmUgcG9pbnRzPSI4IDYgMiAxMiA4IDE4Ij48L3BvbHlsaW5lPjwvc3ZnPg==";

const DEVICON: &str = "https://cdn.jsdelivr.net/gh/devicons/devicon/icons";

fn devicon_path(name: &str) -> Option<&'static str> {
    Some(match name {
        "C++" => "cplusplus/cplusplus-original.svg",
        "C#" => "csharp/csharp-original.svg",
        "Python" => "python/python-original.svg",
        "JavaScript" => "javascript/javascript-original.svg",
        "HTML/CSS" => "html5/html5-original.svg",
        ".NET MAUI" => "dotnetcore/dotnetcore-original.svg",
        "Qt Framework" => "qt/qt-original.svg",
        "Unity Engine" => "unity/unity-original.svg",
        "Git" => "git/git-original.svg",
        "React" => "react/react-original.svg",
        "TypeScript" => "typescript/typescript-original.svg",
        "Node.js" => "nodejs/nodejs-original.svg",
        "Tailwind" => "tailwindcss/tailwindcss-plain.svg",
        "Rust" => "rust/rust-original.svg",
        _ => return None,
    })
}

/// Logo URL for a skill name, or the placeholder glyph.
pub fn icon_url(name: &str) -> String {
    match devicon_path(name) {
        Some(path) => format!("{}/{}", DEVICON, path),
        None => PLACEHOLDER_ICON.to_string(),
    }
}

/// Counts outstanding image loads. Success and failure both settle an entry;
/// completion is reported exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreloadTracker {
    pending: usize,
    reported: bool,
}

impl PreloadTracker {
    pub fn new(total: usize) -> Self {
        Self { pending: total, reported: false }
    }

    /// Settle one load. Returns true the first time the set becomes complete.
    pub fn settle(&mut self) -> bool {
        self.pending = self.pending.saturating_sub(1);
        self.take_completion()
    }

    /// True once when nothing is pending, e.g. for an empty icon list.
    pub fn take_completion(&mut self) -> bool {
        if self.pending == 0 && !self.reported {
            self.reported = true;
            return true;
        }
        false
    }
}
