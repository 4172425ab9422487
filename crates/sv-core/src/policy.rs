//! Per-file validation policy resolution.
//!
//! For each input file the validator needs two things: which record fields to
//! read, and which issue categories disqualify a record. They are resolved
//! with deliberately different fallback orders.
//!
//! # Fields: most specific artifact first
//!
//! 1. A per-file override for this exact filename.
//! 2. The bulk entry for the file's institution key.
//! 3. The bulk entry of the program the key is an alias of.
//! 4. Nothing: the file has no configured fields.
//!
//! # Issues: institution policy first
//!
//! 1. The bulk entry for the institution key, unless the field lookup for
//!    this file used a per-file override.
//! 2. The bulk entry of the program the key is an alias of.
//! 3. The global `disqualifying_issues`, when present and non-empty.
//! 4. The built-in defaults.
//!
//! The link between the two lookups is the [`ResolutionContext`] returned by
//! [`PolicyResolver::resolve_fields`] and handed to
//! [`PolicyResolver::resolve_issues`].
//!
//! # Example
//!
//! ```
//! use sv_config::ValidatorConfig;
//! use sv_core::policy::{FieldSource, IssueSource, PolicyResolver};
//!
//! let config = ValidatorConfig::from_json(r#"{
//!     "programs": { "yale": {
//!         "input_fields": { "oclc": "035a" },
//!         "disqualifying_issues": { "title_mismatch": 1 }
//!     } },
//!     "aliases": { "yul": "yale" }
//! }"#).unwrap();
//! let resolver = PolicyResolver::new(&config);
//!
//! let fields = resolver.resolve_fields("YUL.2021.mrk");
//! assert_eq!(fields.source, FieldSource::Alias);
//!
//! let issues = resolver.resolve_issues(Some("YUL.2021.mrk"), &fields.context);
//! assert_eq!(issues.source, IssueSource::Alias);
//! assert!(issues.flags.is_active("title_mismatch"));
//! ```

use std::borrow::Cow;
use std::collections::BTreeSet;

use serde::Serialize;
use sv_common::InstitutionKey;
use sv_config::{FieldSet, IssueFlags, ValidatorConfig};
use tracing::{debug, info, warn};

/// State carried from a field lookup into the following issue lookup.
///
/// The default value is the state of a session that has not looked up any
/// fields yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionContext {
    /// Whether the field lookup was answered by a per-file override.
    pub override_used: bool,
}

/// Where a field set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    Override,
    Institution,
    Alias,
    None,
}

/// Where an issue policy came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSource {
    Institution,
    Alias,
    Global,
    BuiltinDefault,
}

impl std::fmt::Display for FieldSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldSource::Override => write!(f, "per-file override"),
            FieldSource::Institution => write!(f, "institution"),
            FieldSource::Alias => write!(f, "alias"),
            FieldSource::None => write!(f, "none"),
        }
    }
}

impl std::fmt::Display for IssueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueSource::Institution => write!(f, "institution"),
            IssueSource::Alias => write!(f, "alias"),
            IssueSource::Global => write!(f, "global"),
            IssueSource::BuiltinDefault => write!(f, "built-in default"),
        }
    }
}

/// Result of [`PolicyResolver::resolve_fields`].
#[derive(Debug, Clone, Serialize)]
pub struct FieldResolution<'a> {
    /// Configured fields, if any source had them.
    pub fields: Option<&'a FieldSet>,
    pub source: FieldSource,
    /// Program whose bulk entry answered, for institution and alias hits.
    pub program: Option<&'a InstitutionKey>,
    /// Pass to [`PolicyResolver::resolve_issues`] for the same file.
    pub context: ResolutionContext,
}

/// Result of [`PolicyResolver::resolve_issues`].
#[derive(Debug, Clone, Serialize)]
pub struct IssueResolution<'a> {
    pub flags: Cow<'a, IssueFlags>,
    pub source: IssueSource,
    pub program: Option<&'a InstitutionKey>,
}

impl IssueResolution<'_> {
    /// Names of the issue categories that disqualify a record.
    pub fn active_categories(&self) -> BTreeSet<String> {
        self.flags.active_categories()
    }
}

/// Resolves fields and issues for input files against a loaded configuration.
///
/// Holds only a shared reference to the configuration; per-file state lives in
/// [`ResolutionContext`], so one resolver can serve any number of files and
/// threads.
#[derive(Debug, Clone, Copy)]
pub struct PolicyResolver<'a> {
    config: &'a ValidatorConfig,
}

impl<'a> PolicyResolver<'a> {
    pub fn new(config: &'a ValidatorConfig) -> Self {
        Self { config }
    }

    /// Fields to validate for `filename`.
    pub fn resolve_fields(&self, filename: &str) -> FieldResolution<'a> {
        if let Some(fields) = self.config.overrides().get(filename) {
            debug!(file = filename, "using per-file input fields");
            return FieldResolution {
                fields: Some(fields),
                source: FieldSource::Override,
                program: None,
                context: ResolutionContext {
                    override_used: true,
                },
            };
        }

        let context = ResolutionContext::default();
        let key = InstitutionKey::from_filename(filename);
        let bulk = self.config.bulk();

        if let Some(program) = bulk.get(key.as_str()) {
            debug!(file = filename, program = %program.name, "using institution input fields");
            return FieldResolution {
                fields: Some(&program.input_fields),
                source: FieldSource::Institution,
                program: Some(&program.name),
                context,
            };
        }

        if let Some(program) = self
            .config
            .aliases()
            .canonical(key.as_str())
            .and_then(|canonical| bulk.get(canonical.as_str()))
        {
            debug!(
                file = filename,
                alias = %key,
                program = %program.name,
                "using aliased institution input fields"
            );
            return FieldResolution {
                fields: Some(&program.input_fields),
                source: FieldSource::Alias,
                program: Some(&program.name),
                context,
            };
        }

        debug!(file = filename, institution = %key, "no input fields configured");
        FieldResolution {
            fields: None,
            source: FieldSource::None,
            program: None,
            context,
        }
    }

    /// Disqualifying issues for `filename`.
    ///
    /// `context` must come from the [`resolve_fields`](Self::resolve_fields)
    /// call for the same file. With no filename, institution lookups are
    /// skipped entirely and the global or built-in policy applies.
    pub fn resolve_issues(
        &self,
        filename: Option<&str>,
        context: &ResolutionContext,
    ) -> IssueResolution<'a> {
        let bulk = self.config.bulk();

        match filename {
            Some(filename) => {
                let key = InstitutionKey::from_filename(filename);

                let direct = bulk
                    .get(key.as_str())
                    .filter(|_| !context.override_used);
                if let Some(program) = direct {
                    info!(program = %program.name, "using disqualifying issues set for institution");
                    return IssueResolution {
                        flags: Cow::Borrowed(&program.disqualifying_issues),
                        source: IssueSource::Institution,
                        program: Some(&program.name),
                    };
                }

                // Reached even after an override: only a direct institution
                // hit is suppressed by it.
                if let Some(program) = self
                    .config
                    .aliases()
                    .canonical(key.as_str())
                    .and_then(|canonical| bulk.get(canonical.as_str()))
                {
                    info!(
                        alias = %key,
                        program = %program.name,
                        "using disqualifying issues set for aliased institution"
                    );
                    return IssueResolution {
                        flags: Cow::Borrowed(&program.disqualifying_issues),
                        source: IssueSource::Alias,
                        program: Some(&program.name),
                    };
                }
            }
            None => debug!("no filename given; skipping institution issue lookup"),
        }

        if let Some(global) = self.config.disqualifying_issues().filter(|f| !f.is_empty()) {
            debug!("using global disqualifying issues");
            return IssueResolution {
                flags: Cow::Borrowed(global),
                source: IssueSource::Global,
                program: None,
            };
        }

        warn!("no disqualifying issues set; using defaults");
        IssueResolution {
            flags: Cow::Owned(IssueFlags::builtin_defaults()),
            source: IssueSource::BuiltinDefault,
            program: None,
        }
    }

    /// Names of the issue categories that disqualify records in `filename`.
    pub fn active_issue_categories(
        &self,
        filename: Option<&str>,
        context: &ResolutionContext,
    ) -> BTreeSet<String> {
        self.resolve_issues(filename, context).active_categories()
    }

    /// Resolve fields, then issues, for one file.
    pub fn resolve(&self, filename: &str) -> FilePolicy<'a> {
        let fields = self.resolve_fields(filename);
        let issues = self.resolve_issues(Some(filename), &fields.context);
        FilePolicy {
            filename: filename.to_string(),
            institution: InstitutionKey::from_filename(filename),
            fields,
            issues,
        }
    }
}

/// Fields and issues resolved together for one file.
#[derive(Debug, Clone, Serialize)]
pub struct FilePolicy<'a> {
    pub filename: String,
    pub institution: InstitutionKey,
    pub fields: FieldResolution<'a>,
    pub issues: IssueResolution<'a>,
}

impl FilePolicy<'_> {
    pub fn has_fields(&self) -> bool {
        self.fields.fields.is_some_and(|f| !f.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sv_config::{AliasMap, BulkConfigStore, PerFileOverrides, ProgramConfig};

    fn config(global: Option<IssueFlags>) -> ValidatorConfig {
        let mut overrides = PerFileOverrides::new();
        overrides.insert("yale.special.mrk", FieldSet::new().with("oclc", "001"));

        let mut bulk = BulkConfigStore::new();
        bulk.insert(
            ProgramConfig::new("yale")
                .with_fields(FieldSet::new().with("oclc", "035a"))
                .with_issues(IssueFlags::new().with("title_mismatch", true)),
        )
        .unwrap();
        bulk.insert(
            ProgramConfig::new("harvard")
                .with_fields(FieldSet::new().with("oclc", "035z"))
                .with_issues(IssueFlags::new().with("oclc_mismatch", true)),
        )
        .unwrap();

        let mut aliases = AliasMap::new();
        aliases.insert("hul", "harvard").unwrap();

        ValidatorConfig::new(overrides, bulk, aliases, global).unwrap()
    }

    fn global() -> IssueFlags {
        IssueFlags::new().with("issn_mismatch", true).with("title_in_jstor", false)
    }

    #[test]
    fn fields_prefer_override() {
        let config = config(None);
        let resolver = PolicyResolver::new(&config);
        let got = resolver.resolve_fields("yale.special.mrk");
        assert_eq!(got.source, FieldSource::Override);
        assert!(got.context.override_used);
        assert_eq!(got.fields.unwrap().get("oclc"), Some("001"));
    }

    #[test]
    fn fields_from_institution_then_alias() {
        let config = config(None);
        let resolver = PolicyResolver::new(&config);

        let direct = resolver.resolve_fields("/input/YALE.2021.mrk");
        assert_eq!(direct.source, FieldSource::Institution);
        assert!(!direct.context.override_used);
        assert_eq!(direct.fields.unwrap().get("oclc"), Some("035a"));

        let alias = resolver.resolve_fields("HUL.tsv");
        assert_eq!(alias.source, FieldSource::Alias);
        assert_eq!(alias.program.map(|k| k.as_str()), Some("harvard"));
        assert_eq!(alias.fields.unwrap().get("oclc"), Some("035z"));
    }

    #[test]
    fn unknown_institution_has_no_fields() {
        let config = config(None);
        let resolver = PolicyResolver::new(&config);
        let got = resolver.resolve_fields("mit.mrk");
        assert_eq!(got.source, FieldSource::None);
        assert!(got.fields.is_none());
    }

    #[test]
    fn issues_from_institution_without_override() {
        let config = config(Some(global()));
        let resolver = PolicyResolver::new(&config);
        let fields = resolver.resolve_fields("yale.2021.mrk");
        let issues = resolver.resolve_issues(Some("yale.2021.mrk"), &fields.context);
        assert_eq!(issues.source, IssueSource::Institution);
        assert!(issues.flags.is_active("title_mismatch"));
    }

    #[test]
    fn override_skips_institution_issues() {
        let config = config(Some(global()));
        let resolver = PolicyResolver::new(&config);
        let fields = resolver.resolve_fields("yale.special.mrk");
        let issues = resolver.resolve_issues(Some("yale.special.mrk"), &fields.context);
        assert_eq!(issues.source, IssueSource::Global);
        assert!(!issues.flags.is_active("title_mismatch"));
        assert!(issues.flags.is_active("issn_mismatch"));
    }

    #[test]
    fn alias_issues_apply_even_after_override() {
        let config = config(Some(global()));
        let resolver = PolicyResolver::new(&config);
        let context = ResolutionContext {
            override_used: true,
        };
        let issues = resolver.resolve_issues(Some("hul.mrk"), &context);
        assert_eq!(issues.source, IssueSource::Alias);
        assert!(issues.flags.is_active("oclc_mismatch"));
    }

    #[test]
    fn no_filename_falls_through_to_global() {
        let config = config(Some(global()));
        let resolver = PolicyResolver::new(&config);
        let issues = resolver.resolve_issues(None, &ResolutionContext::default());
        assert_eq!(issues.source, IssueSource::Global);
    }

    #[test]
    fn builtin_defaults_when_nothing_configured() {
        let config = config(Some(IssueFlags::new()));
        let resolver = PolicyResolver::new(&config);
        let issues = resolver.resolve_issues(Some("mit.mrk"), &ResolutionContext::default());
        assert_eq!(issues.source, IssueSource::BuiltinDefault);
        assert_eq!(*issues.flags, IssueFlags::builtin_defaults());
    }

    #[test]
    fn active_categories_are_truthy_flags_only() {
        let config = config(Some(global()));
        let resolver = PolicyResolver::new(&config);
        let active = resolver.active_issue_categories(None, &ResolutionContext::default());
        assert_eq!(active.into_iter().collect::<Vec<_>>(), vec!["issn_mismatch"]);
    }

    #[test]
    fn resolve_pairs_both_lookups() {
        let config = config(Some(global()));
        let resolver = PolicyResolver::new(&config);

        let policy = resolver.resolve("yale.special.mrk");
        assert_eq!(policy.institution.as_str(), "yale");
        assert_eq!(policy.fields.source, FieldSource::Override);
        assert_eq!(policy.issues.source, IssueSource::Global);
        assert!(policy.has_fields());

        let unknown = resolver.resolve("mit.mrk");
        assert!(!unknown.has_fields());
    }
}
