use crate::artifacts::branch::{HEADS_PREFIX, INVALID_BRANCH_NAME_REGEX, TAGS_PREFIX};
use crate::errors::DagitError;
use anyhow::Context;

/// Full, path-like name of a ref (`HEAD`, `refs/heads/master`, `refs/tags/v1`)
///
/// Always relative and free of `.`/`..` components, so it can be joined onto
/// the metadata directory without escaping it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymRefName(String);

impl SymRefName {
    pub fn try_parse(name: impl Into<String>) -> anyhow::Result<Self> {
        let name = name.into();

        let valid = !name.is_empty()
            && !name.contains(['\\', '\0', '\n'])
            && name
                .split('/')
                .all(|component| !component.is_empty() && component != "." && component != "..");

        if valid {
            Ok(Self(name))
        } else {
            Err(DagitError::InvalidRefName(name).into())
        }
    }

    pub fn head() -> Self {
        Self(crate::areas::refs::HEAD_REF_NAME.to_string())
    }

    pub fn branch(branch_name: &BranchName) -> Self {
        Self(format!("{HEADS_PREFIX}{branch_name}"))
    }

    pub fn tag(tag_name: &BranchName) -> Self {
        Self(format!("{TAGS_PREFIX}{tag_name}"))
    }

    pub fn as_ref_path(&self) -> &str {
        &self.0
    }

    /// Short branch name, if this ref lives under `refs/heads/`
    pub fn branch_name(&self) -> Option<&str> {
        self.0.strip_prefix(HEADS_PREFIX)
    }

    /// Short tag name, if this ref lives under `refs/tags/`
    pub fn tag_name(&self) -> Option<&str> {
        self.0.strip_prefix(TAGS_PREFIX)
    }
}

impl std::fmt::Display for SymRefName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Short name of a branch or a tag, validated with git's ref-format rules
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: String) -> anyhow::Result<Self> {
        if name.is_empty() {
            anyhow::bail!(DagitError::InvalidRefName(name));
        }

        let re = regex::Regex::new(INVALID_BRANCH_NAME_REGEX)
            .with_context(|| format!("invalid branch name regex: {INVALID_BRANCH_NAME_REGEX}"))?;

        if re.is_match(&name) {
            anyhow::bail!(DagitError::InvalidRefName(name));
        }

        Ok(Self(name))
    }

    pub fn try_parse_sym_ref_name(sym_ref_name: &SymRefName) -> anyhow::Result<Self> {
        let branch_name = sym_ref_name.branch_name().with_context(|| {
            format!("symbolic ref name must start with '{HEADS_PREFIX}', got '{sym_ref_name}'")
        })?;

        Self::try_parse(branch_name.to_string())
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
