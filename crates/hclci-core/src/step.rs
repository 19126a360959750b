//! Job steps and their YAML form.

use serde::{Deserialize, Serialize};

/// One action in a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    /// Check out the project source.
    Checkout,
    /// Run a shell command.
    Run { command: String },
    /// Save files for downstream jobs.
    PersistToWorkspace { root: String, paths: Vec<String> },
    /// Restore files saved by an upstream job.
    AttachWorkspace { at: String },
    /// Raw text emitted as is.
    Literal { content: String },
}

impl Step {
    /// Block type this step is written as.
    pub fn kind(&self) -> &'static str {
        match self {
            Step::Checkout => "checkout",
            Step::Run { .. } => "run",
            Step::PersistToWorkspace { .. } => "persist_to_workspace",
            Step::AttachWorkspace { .. } => "attach_workspace",
            Step::Literal { .. } => "literal",
        }
    }

    /// Render as a YAML list item with every line indented by `indent` spaces.
    pub fn render(&self, indent: usize) -> String {
        let lines = match self {
            Step::Checkout => vec!["- checkout".to_string()],
            Step::Run { command } => vec![format!("- run: {}", command)],
            Step::PersistToWorkspace { root, paths } => {
                let mut lines = vec![
                    "- persist_to_workspace:".to_string(),
                    format!("    root: {}", root),
                ];
                if !paths.is_empty() {
                    lines.push("    paths:".to_string());
                    lines.extend(paths.iter().map(|p| format!("      - {}", p)));
                }
                lines
            }
            Step::AttachWorkspace { at } => {
                vec!["- attach_workspace:".to_string(), format!("    at: {}", at)]
            }
            Step::Literal { content } => content.lines().map(str::to_string).collect(),
        };
        indent_lines(&lines, indent)
    }
}

/// Prefix every line with `indent` spaces and join them, dropping trailing blank lines.
///
/// Elements containing newlines are split, so a value ending in `\n` (a heredoc)
/// adds no blank line.
pub fn indent_lines<S: AsRef<str>>(lines: &[S], indent: usize) -> String {
    let lines: Vec<&str> = lines.iter().flat_map(|l| l.as_ref().split('\n')).collect();
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(0, |i| i + 1);
    let spacer = " ".repeat(indent);

    lines[..end]
        .iter()
        .map(|l| format!("{}{}", spacer, l))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn literal(content: &str) -> Step {
        Step::Literal {
            content: content.to_string(),
        }
    }

    fn persist() -> Step {
        Step::PersistToWorkspace {
            root: "/workspace".to_string(),
            paths: vec!["a".to_string(), "b".to_string()],
        }
    }

    #[test]
    fn test_literal_empty() {
        assert_eq!(literal("").render(0), "");
        assert_eq!(literal("").render(4), "");
    }

    #[test]
    fn test_literal_content() {
        assert_eq!(literal("Hello, World!").render(0), "Hello, World!");
    }

    #[test]
    fn test_literal_indent() {
        assert_eq!(literal("- test").render(4), "    - test");
    }

    #[test]
    fn test_literal_trailing_blank_lines_trimmed() {
        assert_eq!(literal("- a\n- b\n\n\n").render(2), "  - a\n  - b");
    }

    #[test]
    fn test_run_heredoc_trailing_newline_trimmed() {
        let step = Step::Run {
            command: "make\n".to_string(),
        };
        assert_eq!(step.render(6), "      - run: make");
    }

    #[test]
    fn test_embedded_newlines_are_indented() {
        assert_eq!(indent_lines(&["- a\n- b\n"], 2), "  - a\n  - b");
    }

    #[test]
    fn test_checkout() {
        assert_eq!(Step::Checkout.render(6), "      - checkout");
    }

    #[test]
    fn test_run() {
        let step = Step::Run {
            command: "go test".to_string(),
        };
        assert_eq!(step.render(0), "- run: go test");
    }

    #[test]
    fn test_persist_with_paths() {
        let expected = [
            "- persist_to_workspace:",
            "    root: /workspace",
            "    paths:",
            "      - a",
            "      - b",
        ]
        .join("\n");
        assert_eq!(persist().render(0), expected);
    }

    #[test]
    fn test_persist_without_paths() {
        let step = Step::PersistToWorkspace {
            root: ".".to_string(),
            paths: Vec::new(),
        };
        assert_eq!(step.render(2), "  - persist_to_workspace:\n      root: .");
    }

    #[test]
    fn test_attach() {
        let step = Step::AttachWorkspace {
            at: "/tmp/ws".to_string(),
        };
        assert_eq!(step.render(0), "- attach_workspace:\n    at: /tmp/ws");
    }

    #[test]
    fn test_indent_is_additive() {
        let steps = [
            Step::Checkout,
            persist(),
            Step::AttachWorkspace { at: "/w".into() },
            literal("x\n  y"),
        ];
        for step in &steps {
            for (n, k) in [(0, 3), (2, 4), (6, 0)] {
                let shifted = step
                    .render(n)
                    .lines()
                    .map(|l| format!("{}{}", " ".repeat(k), l))
                    .collect::<Vec<_>>()
                    .join("\n");
                assert_eq!(shifted, step.render(n + k), "{} at {}+{}", step.kind(), n, k);
            }
        }
    }

    #[test]
    fn test_kind_matches_block_type() {
        assert_eq!(persist().kind(), "persist_to_workspace");
        assert_eq!(Step::Checkout.kind(), "checkout");
    }
}
