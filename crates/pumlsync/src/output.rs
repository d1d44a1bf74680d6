//! Terminal reporting of generation results.
//!
//! Reports are built as lists of `(Tone, text)` lines first, so their content
//! does not depend on the terminal.

use console::{Style, Term};
use pumlsync_sync::{SyncOutcome, SyncPlan};

/// Reported when no diagram needs a new SVG.
const NOTHING_GENERATED: &str = "There are no files to be generated.";

/// How a reported line is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tone {
    Plain,
    Success,
    Notice,
    Failure,
    Banner,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Self::Plain => Style::new(),
            Self::Success => Style::new().green(),
            Self::Notice => Style::new().yellow(),
            Self::Failure => Style::new().red(),
            Self::Banner => Style::new().cyan().bold(),
        }
    }
}

pub(crate) type Line = (Tone, String);

fn plain(text: impl Into<String>) -> Line {
    (Tone::Plain, text.into())
}

/// Lines reporting a run: generated paths, then the commit.
pub(crate) fn outcome_lines(outcome: &SyncOutcome) -> Vec<Line> {
    let SyncOutcome::Committed(result) = outcome else {
        return vec![plain(NOTHING_GENERATED)];
    };

    let mut lines: Vec<Line> = result.paths.iter().map(plain).collect();
    lines.push((Tone::Success, "Above files are generated.".to_owned()));
    lines.push(plain(format!("Commit: {} ({})", result.sha, result.git_ref)));
    lines
}

/// Lines reporting a dry run.
pub(crate) fn plan_lines(plan: &SyncPlan) -> Vec<Line> {
    let mut lines = vec![(Tone::Banner, "[DRY RUN] No changes made.".to_owned())];

    if plan.has_changes() {
        lines.push((
            Tone::Notice,
            format!("Files that would be generated ({}):", plan.changed.len()),
        ));
        lines.extend(plan.changed.iter().map(|path| plain(format!("  -> {path}"))));
    } else {
        lines.push(plain(NOTHING_GENERATED));
    }
    if !plan.unchanged.is_empty() {
        lines.push(plain(format!("Up to date: {}", plan.unchanged.len())));
    }
    lines
}

/// Writes reports to stderr.
pub(crate) struct Output {
    term: Term,
}

impl Output {
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    fn write(&self, lines: &[Line]) {
        for (tone, text) in lines {
            let _ = self.term.write_line(&tone.style().apply_to(text).to_string());
        }
    }

    /// Report the result of a run.
    pub(crate) fn outcome(&self, outcome: &SyncOutcome) {
        self.write(&outcome_lines(outcome));
    }

    /// Report the result of a dry run.
    pub(crate) fn plan(&self, plan: &SyncPlan) {
        self.write(&plan_lines(plan));
    }

    /// Report a failure.
    pub(crate) fn error(&self, msg: &str) {
        self.write(&[(Tone::Failure, msg.to_owned())]);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use pumlsync_sync::CommitResult;

    use super::*;

    fn texts(lines: &[Line]) -> Vec<&str> {
        lines.iter().map(|(_, text)| text.as_str()).collect()
    }

    #[test]
    fn test_no_changes() {
        let lines = outcome_lines(&SyncOutcome::NoChanges);

        assert_eq!(lines, vec![plain(NOTHING_GENERATED)]);
    }

    #[test]
    fn test_committed_lists_paths_then_commit() {
        let outcome = SyncOutcome::Committed(CommitResult {
            sha: "abc123".to_owned(),
            git_ref: "heads/main".to_owned(),
            paths: vec!["docs/a.svg".to_owned(), "flow.svg".to_owned()],
        });

        let lines = outcome_lines(&outcome);

        assert_eq!(
            texts(&lines),
            vec![
                "docs/a.svg",
                "flow.svg",
                "Above files are generated.",
                "Commit: abc123 (heads/main)",
            ]
        );
        assert_eq!(lines[2].0, Tone::Success);
    }

    #[test]
    fn test_plan_with_changes() {
        let plan = SyncPlan {
            changed: vec!["flow.svg".to_owned()],
            unchanged: vec!["docs/a.svg".to_owned()],
        };

        let lines = plan_lines(&plan);

        assert_eq!(
            texts(&lines),
            vec![
                "[DRY RUN] No changes made.",
                "Files that would be generated (1):",
                "  -> flow.svg",
                "Up to date: 1",
            ]
        );
        assert_eq!(lines[0].0, Tone::Banner);
        assert_eq!(lines[1].0, Tone::Notice);
    }

    #[test]
    fn test_empty_plan() {
        let lines = plan_lines(&SyncPlan::default());

        assert_eq!(
            texts(&lines),
            vec!["[DRY RUN] No changes made.", NOTHING_GENERATED]
        );
    }
}
