//! Colored terminal reporting for apinav runs.

use std::path::Path;

use apinav_sidebar::{BrokenReference, EmitReport, SidebarTree};
use console::{Style, Term};

/// Reports progress and results of a command on stderr.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
    cyan_bold: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            cyan_bold: Style::new().cyan().bold(),
        }
    }

    fn line(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    fn styled(&self, style: &Style, msg: &str) {
        self.line(&style.apply_to(msg).to_string());
    }

    /// Name an input or output location, e.g. `OpenAPI document: api/openapi.yaml`.
    pub(crate) fn location(&self, what: &str, path: &Path) {
        self.line(&format!("{what}: {}", path.display()));
    }

    /// Print the API title and one line per category.
    pub(crate) fn outline(&self, tree: &SidebarTree) {
        self.styled(&self.cyan_bold, &tree.overview.info.title);
        for category in &tree.categories {
            self.line(&category_line(&category.label, category.entries.len()));
        }
    }

    /// Warn about sidebar entries without a document.
    pub(crate) fn broken_references(&self, broken: &[BrokenReference]) {
        for reference in broken {
            self.styled(&self.yellow, &format!("Warning: {reference}"));
        }
    }

    /// Summarize a finished build.
    pub(crate) fn built(&self, tree: &SidebarTree, report: &EmitReport) {
        if report.removed > 0 {
            self.line(&format!("Removed {} stale files", report.removed));
        }
        self.styled(
            &self.green,
            &format!("Generated {} files ({})", report.written.len(), counts(tree)),
        );
    }

    /// Summarize a finished check.
    pub(crate) fn checked(&self, tree: &SidebarTree, broken: usize, dest: &Path) {
        if broken == 0 {
            self.styled(&self.green, &format!("Sidebar OK: {}", counts(tree)));
        } else {
            self.styled(
                &self.yellow,
                &format!(
                    "{broken} sidebar entries have no document in {} (run `apinav build`)",
                    dest.display()
                ),
            );
        }
    }

    /// Summarize a finished clean.
    pub(crate) fn cleaned(&self, removed: usize, dest: &Path) {
        self.styled(
            &self.green,
            &format!("Removed {removed} generated files from {}", dest.display()),
        );
    }

    /// Print a fatal error (red).
    pub(crate) fn error(&self, msg: &str) {
        self.styled(&self.red, msg);
    }
}

fn counts(tree: &SidebarTree) -> String {
    format!(
        "{} operations in {} categories",
        tree.entries().count(),
        tree.categories.len()
    )
}

fn category_line(label: &str, operations: usize) -> String {
    let noun = if operations == 1 { "operation" } else { "operations" };
    format!("  {label} ({operations} {noun})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use apinav_sidebar::{DocumentFormat, OpenApiDocument, compile};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_counts() {
        let yaml = "openapi: 3.0.3\ninfo:\n  title: Food API\npaths:\n  /food:\n    get:\n      tags: [Search]\n    post:\n      tags: [Provider]\n";
        let tree = compile(&OpenApiDocument::parse(yaml, DocumentFormat::Yaml).unwrap()).unwrap();

        assert_eq!(counts(&tree), "2 operations in 2 categories");
    }

    #[test]
    fn test_category_line() {
        assert_eq!(category_line("Search", 1), "  Search (1 operation)");
        assert_eq!(category_line("UNTAGGED", 3), "  UNTAGGED (3 operations)");
    }
}
