use super::report::{Reporter, RestartEvent};
use crate::core::checkpoint::CheckpointSet;
use crate::core::config::{ConfigDocument, Directive, DirectiveError, END_ANCHOR};
use std::path::Path;
use thiserror::Error;

/// Directive the restart block is inserted after.
const COORDINATES: &str = "coordinates";
const RUN: &str = "run";
/// Options made meaningless once binary coordinates and velocities are loaded.
const SUPERSEDED: [&str; 3] = ["temperature", "minimize", "reinitvels"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RewriteError {
    #[error("Required directive '{keyword}' not found in configuration")]
    MissingDirective { keyword: &'static str },

    #[error("Invalid additional option: {0}")]
    InvalidOption(#[from] DirectiveError),
}

/// Applies the restart edits to a configuration document it owns for the duration.
pub struct ConfigRewriter<'r, 'a> {
    document: ConfigDocument,
    reporter: &'r Reporter<'a>,
}

impl<'r, 'a> ConfigRewriter<'r, 'a> {
    pub fn new(document: ConfigDocument, reporter: &'r Reporter<'a>) -> Self {
        Self { document, reporter }
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    pub fn into_document(self) -> ConfigDocument {
        self.document
    }

    /// Points the configuration at `checkpoints` and continues numbering from `step`.
    ///
    /// A blank line is inserted after the `coordinates` directive and the restart
    /// directives are upserted anchored on it, so new ones land right below it in reverse
    /// order: `firsttimestep`, `extendedSystem`, `binvelocities`, `bincoordinates`,
    /// `set outputname`. Options superseded by the binary restart state are commented out.
    ///
    /// # Errors
    ///
    /// Fails if the document has no `coordinates` directive.
    pub fn insert_restart_block(
        &mut self,
        step: u64,
        checkpoints: &CheckpointSet,
        output_prefix: &Path,
    ) -> Result<(), RewriteError> {
        self.reporter.report(RestartEvent::PreparingConfiguration);

        let coordinates = self
            .document
            .locate(COORDINATES)
            .ok_or(RewriteError::MissingDirective {
                keyword: COORDINATES,
            })?;
        let anchor = coordinates + 1;
        self.document.insert_line(anchor, "");

        let block = [
            Directive::new("set outputname", [output_prefix.display()]),
            Directive::new("bincoordinates", [checkpoints.coor().display()]),
            Directive::new("binvelocities", [checkpoints.vel().display()]),
            Directive::new("extendedSystem", [checkpoints.xsc().display()]),
            Directive::new("firsttimestep", [step]),
        ];
        for directive in &block {
            self.document.upsert(directive, anchor);
        }

        for keyword in SUPERSEDED {
            self.comment_out(keyword);
        }
        Ok(())
    }

    /// Sets the length of the continuation run and returns it.
    ///
    /// An explicit `run_override` is used as given. Otherwise the remaining steps are the
    /// previous `run` value minus `step`; when nothing remains, `step` itself is used so
    /// that no zero-length run is issued. Returns `None`, leaving the document untouched,
    /// when there is no readable `run` directive to compute from.
    pub fn set_run_steps(&mut self, step: u64, run_override: Option<u64>) -> Option<u64> {
        let steps = match run_override {
            Some(steps) => steps,
            None => {
                let total = self.previous_run_steps()?;
                match total.checked_sub(step) {
                    Some(remaining) if remaining > 0 => remaining,
                    _ => step,
                }
            }
        };

        self.reporter
            .report(RestartEvent::SettingRunSteps { steps });
        self.document
            .upsert(&Directive::new(RUN, [steps]), END_ANCHOR);
        Some(steps)
    }

    /// Upserts each user supplied token group as a directive at the end of the document.
    ///
    /// # Errors
    ///
    /// Fails on an empty group; groups before it have already been applied.
    pub fn apply_additional_options<S: AsRef<str>>(
        &mut self,
        groups: &[Vec<S>],
    ) -> Result<(), RewriteError> {
        for group in groups {
            let directive = Directive::from_tokens(group)?;
            self.reporter.report(RestartEvent::SettingParameter {
                directive: directive.to_string(),
            });
            self.document.upsert(&directive, END_ANCHOR);
        }
        Ok(())
    }

    /// Comments out `keyword`, warning when the configuration does not have it.
    pub fn comment_out(&mut self, keyword: &str) -> bool {
        let found = self.document.comment_out(keyword);
        if !found {
            self.reporter.report(RestartEvent::DirectiveNotFound {
                keyword: keyword.to_string(),
            });
        }
        found
    }

    fn previous_run_steps(&self) -> Option<u64> {
        let Some(index) = self.document.locate(RUN) else {
            self.reporter.report(RestartEvent::DirectiveNotFound {
                keyword: RUN.to_string(),
            });
            return None;
        };

        let line = self.document.line(index).unwrap_or_default();
        let total = line
            .trim_start_matches('#')
            .parse::<Directive>()
            .ok()
            .and_then(|directive| directive.first_value()?.parse().ok());
        if total.is_none() {
            self.reporter.report(RestartEvent::RunStepsUnreadable {
                line: line.to_string(),
            });
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::checkpoint::resolver::resolve;
    use crate::engine::report::testing::recording_reporter;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const CONF: &str = "\
structure          ionized.psf
coordinates        ionized.pdb
set temperature    310
temperature        $temperature
set outputname     eq
minimize           1000
reinitvels         $temperature
run 1000
";

    fn document(text: &str) -> ConfigDocument {
        ConfigDocument::from_lines(text.split_inclusive('\n').map(str::to_string).collect())
    }

    fn render(rewriter: &ConfigRewriter) -> String {
        rewriter.document().lines().concat()
    }

    fn checkpoints() -> (TempDir, CheckpointSet) {
        let dir = tempfile::tempdir().unwrap();
        for name in ["eq.restart.xsc", "eq.restart.coor", "eq.restart.vel"] {
            fs::write(dir.path().join(name), "data").unwrap();
        }
        let set = resolve(dir.path(), &Reporter::silent()).unwrap();
        (dir, set)
    }

    #[test]
    fn restart_block_follows_coordinates_and_comments_superseded_options() {
        let (dir, set) = checkpoints();
        let reporter = Reporter::silent();
        let mut rewriter = ConfigRewriter::new(document(CONF), &reporter);

        rewriter
            .insert_restart_block(400, &set, &PathBuf::from("out/eq"))
            .unwrap();

        let d = dir.path().display();
        let expected = format!(
            "\
structure          ionized.psf
coordinates        ionized.pdb

firsttimestep 400
extendedSystem {d}/eq.restart.xsc
binvelocities {d}/eq.restart.vel
bincoordinates {d}/eq.restart.coor
set temperature    310
#temperature        $temperature
set outputname out/eq
#minimize           1000
#reinitvels         $temperature
run 1000
"
        );
        assert_eq!(render(&rewriter), expected);
    }

    #[test]
    fn missing_coordinates_is_an_error() {
        let (_dir, set) = checkpoints();
        let reporter = Reporter::silent();
        let mut rewriter = ConfigRewriter::new(document("structure a.psf\nrun 10\n"), &reporter);

        let result = rewriter.insert_restart_block(1, &set, Path::new("out/eq"));

        assert_eq!(
            result,
            Err(RewriteError::MissingDirective {
                keyword: "coordinates"
            })
        );
    }

    #[test]
    fn absent_superseded_options_only_warn() {
        let (_dir, set) = checkpoints();
        let (reporter, events) = recording_reporter();
        let mut rewriter =
            ConfigRewriter::new(document("coordinates a.pdb\nrun 10\n"), &reporter);

        rewriter
            .insert_restart_block(5, &set, Path::new("out/eq"))
            .unwrap();

        let events = events.lock().unwrap();
        let missing: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                RestartEvent::DirectiveNotFound { keyword } => Some(keyword.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(missing, ["temperature", "minimize", "reinitvels"]);
    }

    #[test]
    fn remaining_steps_are_computed_from_the_previous_run() {
        let reporter = Reporter::silent();
        let mut rewriter = ConfigRewriter::new(document(CONF), &reporter);

        assert_eq!(rewriter.set_run_steps(400, None), Some(600));
        assert_eq!(rewriter.document().line(7), Some("run 600\n"));
    }

    #[test]
    fn finished_run_is_reissued_with_its_full_length() {
        let reporter = Reporter::silent();
        let mut rewriter = ConfigRewriter::new(document(CONF), &reporter);

        assert_eq!(rewriter.set_run_steps(1000, None), Some(1000));
        assert_eq!(rewriter.document().line(7), Some("run 1000\n"));
    }

    #[test]
    fn override_wins_over_the_previous_run() {
        let reporter = Reporter::silent();
        let mut rewriter = ConfigRewriter::new(document(CONF), &reporter);

        assert_eq!(rewriter.set_run_steps(400, Some(5000)), Some(5000));
        assert_eq!(rewriter.document().line(7), Some("run 5000\n"));
    }

    #[test]
    fn unreadable_run_leaves_the_document_alone() {
        let (reporter, events) = recording_reporter();
        let original = document("coordinates a.pdb\nrun $steps\n");
        let mut rewriter = ConfigRewriter::new(original.clone(), &reporter);

        assert_eq!(rewriter.set_run_steps(400, None), None);
        assert_eq!(rewriter.document(), &original);
        assert!(matches!(
            events.lock().unwrap().last(),
            Some(RestartEvent::RunStepsUnreadable { .. })
        ));
    }

    #[test]
    fn additional_options_are_upserted_in_order() {
        let reporter = Reporter::silent();
        let mut rewriter = ConfigRewriter::new(document(CONF), &reporter);

        rewriter
            .apply_additional_options(&[
                vec!["langevinDamping", "5"],
                vec!["set", "temperature", "300"],
            ])
            .unwrap();

        let rendered = render(&rewriter);
        assert!(rendered.starts_with("structure          ionized.psf\ncoordinates        ionized.pdb\nset temperature 300\n"));
        assert!(rendered.ends_with("langevinDamping 5\nrun 1000\n"));
    }

    #[test]
    fn empty_option_group_is_rejected() {
        let reporter = Reporter::silent();
        let mut rewriter = ConfigRewriter::new(document(CONF), &reporter);
        let groups: Vec<Vec<String>> = vec![Vec::new()];

        assert_eq!(
            rewriter.apply_additional_options(&groups),
            Err(RewriteError::InvalidOption(DirectiveError::Empty))
        );
    }
}
