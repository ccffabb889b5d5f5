//! Read → replace → write over a text resource.

use crate::app::replace::replace_literal;
use crate::domain::errors::PatchError;
use crate::domain::model::{NoMatchPolicy, PatchOutcome, PatchSpec};
use crate::domain::resource::TextResource;
use crate::infra::fs::{FileResource, WriteOptions};

/// Outcome of a patch plus the text before and after substitution.
#[derive(Debug, Clone)]
pub struct PatchReport {
    pub outcome: PatchOutcome,
    pub before: String,
    pub after: String,
}

/// Applies [`PatchSpec`]s to files or arbitrary [`TextResource`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patcher {
    write: WriteOptions,
    dry_run: bool,
}

impl Patcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_write_options(mut self, write: WriteOptions) -> Self {
        self.write = write;
        self
    }

    /// Compute results without writing anything back.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Patch the file named by `spec.source_path`.
    pub fn patch_file(&self, spec: &PatchSpec) -> Result<PatchReport, PatchError> {
        let mut resource = FileResource::with_options(&spec.source_path, self.write.clone());
        self.patch_resource(spec, &mut resource)
    }

    /// Patch `resource` in place. The resource is only written when the text
    /// changed and this is not a dry run.
    pub fn patch_resource<R>(
        &self,
        spec: &PatchSpec,
        resource: &mut R,
    ) -> Result<PatchReport, PatchError>
    where
        R: TextResource + ?Sized,
    {
        let path = resource.location().to_path_buf();
        let before = resource.read_text()?;
        let replaced = replace_literal(&before, &spec.needle, &spec.replacement, spec.mode)?;

        if replaced.occurrences == 0 {
            match spec.on_no_match {
                NoMatchPolicy::Error => return Err(PatchError::NoMatch { path }),
                NoMatchPolicy::Warn => {
                    tracing::warn!(path = %path.display(), "needle not found; file left unchanged")
                }
                NoMatchPolicy::Ignore => {
                    tracing::debug!(path = %path.display(), "needle not found")
                }
            }
        }

        let changed = replaced.text != before;
        let written = changed && !self.dry_run;
        if written {
            resource.write_text(&replaced.text)?;
            tracing::info!(
                path = %path.display(),
                occurrences = replaced.occurrences,
                mode = %spec.mode,
                "patched file"
            );
        }

        Ok(PatchReport {
            outcome: PatchOutcome {
                path,
                occurrences: replaced.occurrences,
                written,
                dry_run: self.dry_run,
                backup: resource.backup_path().map(|path| path.to_path_buf()),
            },
            before,
            after: replaced.text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ReplaceMode;
    use crate::infra::memory::MemoryResource;

    fn patch(text: &str, spec: &PatchSpec) -> (Result<PatchReport, PatchError>, MemoryResource) {
        let mut resource = MemoryResource::new("mem.txt", text);
        let result = Patcher::new().patch_resource(spec, &mut resource);
        (result, resource)
    }

    #[test]
    fn replaces_and_writes_back() {
        let spec = PatchSpec::new("mem.txt", "B", "X");
        let (result, resource) = patch("A.B.C", &spec);
        let report = result.unwrap();
        assert_eq!(resource.text(), "A.X.C");
        assert_eq!(resource.writes(), 1);
        assert!(report.outcome.replaced());
        assert!(report.outcome.written);
        assert_eq!(report.before, "A.B.C");
        assert_eq!(report.after, "A.X.C");
    }

    #[test]
    fn missing_needle_leaves_content_and_skips_write() {
        let spec = PatchSpec::new("mem.txt", "Z", "X");
        let (result, resource) = patch("A.B.C", &spec);
        let report = result.unwrap();
        assert_eq!(resource.text(), "A.B.C");
        assert_eq!(resource.writes(), 0);
        assert!(!report.outcome.replaced());
        assert!(!report.outcome.written);
    }

    #[test]
    fn empty_resource_stays_empty() {
        let spec = PatchSpec::new("mem.txt", "needle", "x");
        let (result, resource) = patch("", &spec);
        assert_eq!(result.unwrap().outcome.occurrences, 0);
        assert_eq!(resource.text(), "");
    }

    #[test]
    fn error_policy_fails_on_no_match() {
        let spec = PatchSpec::new("mem.txt", "Z", "X").with_no_match(NoMatchPolicy::Error);
        let (result, resource) = patch("A.B.C", &spec);
        assert!(matches!(result, Err(PatchError::NoMatch { .. })));
        assert_eq!(resource.writes(), 0);
    }

    #[test]
    fn second_application_is_a_no_match() {
        let spec = PatchSpec::new("mem.txt", "<span>L</span>", "<video />");
        let mut resource = MemoryResource::new("mem.txt", "<div><span>L</span></div>");
        let patcher = Patcher::new();

        let first = patcher.patch_resource(&spec, &mut resource).unwrap();
        assert_eq!(first.outcome.occurrences, 1);
        let second = patcher.patch_resource(&spec, &mut resource).unwrap();
        assert_eq!(second.outcome.occurrences, 0);
        assert_eq!(resource.text(), "<div><video /></div>");
        assert_eq!(resource.writes(), 1);
    }

    #[test]
    fn reverse_patch_restores_original() {
        let original = "line one\n  block\nline three\n";
        let forward = PatchSpec::new("mem.txt", "  block\n", "  replaced block\n");
        let backward = PatchSpec::new("mem.txt", "  replaced block\n", "  block\n");
        let mut resource = MemoryResource::new("mem.txt", original);
        let patcher = Patcher::new();

        patcher.patch_resource(&forward, &mut resource).unwrap();
        patcher.patch_resource(&backward, &mut resource).unwrap();
        assert_eq!(resource.into_text(), original);
    }

    #[test]
    fn first_mode_is_honoured() {
        let spec = PatchSpec::new("mem.txt", "a", "b").with_mode(ReplaceMode::First);
        let (result, resource) = patch("a a", &spec);
        assert_eq!(result.unwrap().outcome.occurrences, 1);
        assert_eq!(resource.text(), "b a");
    }

    #[test]
    fn dry_run_never_writes() {
        let spec = PatchSpec::new("mem.txt", "B", "X");
        let mut resource = MemoryResource::new("mem.txt", "A.B.C");
        let report = Patcher::new()
            .dry_run(true)
            .patch_resource(&spec, &mut resource)
            .unwrap();
        assert_eq!(resource.writes(), 0);
        assert_eq!(resource.text(), "A.B.C");
        assert_eq!(report.after, "A.X.C");
        assert!(report.outcome.dry_run);
        assert!(!report.outcome.written);
    }

    #[test]
    fn identical_replacement_counts_but_skips_write() {
        let spec = PatchSpec::new("mem.txt", "B", "B");
        let (result, resource) = patch("A.B.C", &spec);
        let report = result.unwrap();
        assert_eq!(report.outcome.occurrences, 1);
        assert!(!report.outcome.written);
        assert_eq!(resource.writes(), 0);
    }

    #[test]
    fn patch_file_round_trips_through_disk() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("Home.tsx");
        std::fs::write(&path, "A.B.C").unwrap();

        let spec = PatchSpec::new(&path, "B", "X");
        let report = Patcher::new().patch_file(&spec).unwrap();
        assert_eq!(report.outcome.path, path);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "A.X.C");
    }
}
