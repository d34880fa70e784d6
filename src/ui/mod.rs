//! Console rendering of projected results.
//!
//! Output is plain text with optional ANSI styling: dim item separators, a
//! bold green count footer, and a reversed save notice.

use owo_colors::OwoColorize;
use std::fmt::Display;
use std::io::IsTerminal;
use std::path::Path;

use crate::pipeline::ProjectedView;

/// Line printed after every item
pub const SEPARATOR: &str = "--------------------";

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Whether to emit colour, given the configured preference
pub fn use_color(enabled: bool) -> bool {
    enabled && std::env::var_os("NO_COLOR").is_none() && is_terminal()
}

/// Render a projected view as the lines printed to stdout.
pub fn render_view(view: &ProjectedView, color: bool) -> String {
    let mut out = String::new();

    for item in &view.items {
        for field in &item.fields {
            out.push_str(&format!("{}: {}\n", field.name, field.value));
        }
        if color {
            out.push_str(&format!("{}\n", SEPARATOR.dimmed()));
        } else {
            out.push_str(SEPARATOR);
            out.push('\n');
        }
    }

    let processed = format!("RESULTS PROCESSED: {}", view.summary.processed);
    out.push_str(&emphasis(&processed, color));
    out.push('\n');

    if let Some(total) = view.summary.total_results {
        let total = format!("TOTAL RESULTS: {}", total);
        out.push_str(&emphasis(&total, color));
        out.push('\n');
    }

    out
}

/// Notice printed once the result was written to disk
pub fn saved_notice(path: &Path, color: bool) -> String {
    let text = format!("SAVED TO: {}", path.display());
    if color {
        text.reversed().to_string()
    } else {
        text
    }
}

/// A fatal error line for stderr
pub fn error_line(err: &dyn Display, color: bool) -> String {
    let text = format!("error: {}", err);
    if color {
        text.red().to_string()
    } else {
        text
    }
}

fn emphasis(text: &str, color: bool) -> String {
    if color {
        text.green().bold().to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{ProjectedField, ProjectedItem, Summary};

    fn view(total: Option<u64>) -> ProjectedView {
        ProjectedView {
            items: vec![ProjectedItem {
                fields: vec![
                    ProjectedField {
                        name: "title",
                        value: "T".to_string(),
                    },
                    ProjectedField {
                        name: "author",
                        value: "A".to_string(),
                    },
                ],
            }],
            summary: Summary {
                processed: 1,
                total_results: total,
            },
        }
    }

    #[test]
    fn test_render_plain() {
        assert_eq!(
            render_view(&view(None), false),
            "title: T\nauthor: A\n--------------------\nRESULTS PROCESSED: 1\n"
        );
    }

    #[test]
    fn test_render_total_for_multi_page() {
        let text = render_view(&view(Some(50)), false);
        assert!(text.ends_with("RESULTS PROCESSED: 1\nTOTAL RESULTS: 50\n"));
    }

    #[test]
    fn test_render_colored_keeps_text() {
        let text = render_view(&view(None), true);
        assert!(text.contains("title: T"));
        assert!(text.contains("RESULTS PROCESSED: 1"));
        assert!(text.contains('\u{1b}'));
    }

    #[test]
    fn test_saved_notice() {
        assert_eq!(
            saved_notice(Path::new("/tmp/out.json"), false),
            "SAVED TO: /tmp/out.json"
        );
    }

    #[test]
    fn test_error_line() {
        assert_eq!(error_line(&"boom", false), "error: boom");
    }
}
