use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Binding {
    pub keys: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct HelpSection {
    pub title: &'static str,
    pub bindings: &'static [Binding],
}

const fn bind(keys: &'static str, description: &'static str) -> Binding {
    Binding { keys, description }
}

/// Everything the help overlay lists.
pub static HELP_SECTIONS: &[HelpSection] = &[
    HelpSection {
        title: "Navigation",
        bindings: &[
            bind("h / \u{2190}", "Left"),
            bind("j / \u{2193}", "Down"),
            bind("k / \u{2191}", "Up"),
            bind("l / \u{2192}", "Right"),
            bind("gg / G", "Top / Bottom"),
            bind("Esc", "Clear selection / close"),
        ],
    },
    HelpSection {
        title: "Actions",
        bindings: &[
            bind("Enter / o", "Open"),
            bind("x", "Toggle complete"),
            bind("n", "New (context)"),
            bind("v", "Toggle List/Board (Tasks)"),
        ],
    },
    HelpSection {
        title: "Go To",
        bindings: &[
            bind("g t", "All Tasks"),
            bind("g p", "Projects"),
            bind("g a", "Tags"),
        ],
    },
    HelpSection {
        title: "Global",
        bindings: &[
            bind("?", "Toggle this help"),
            bind("q / Ctrl+Q", "Quit"),
        ],
    },
];

/// Plain-text rendering used by `chronic keys`.
pub fn help_text() -> String {
    let mut out = String::new();
    for (i, section) in HELP_SECTIONS.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(section.title);
        out.push('\n');
        for b in section.bindings {
            out.push_str(&format!("  {:<12}{}\n", b.keys, b.description));
        }
    }
    out
}
