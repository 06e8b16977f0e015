//! References (HEAD, branches, tags)
//!
//! References are mutable, human-readable names for points in the commit graph.
//! A reference is either:
//! - Direct: holding an object ID, or nothing yet (an unborn branch)
//! - Symbolic: naming another reference (e.g., HEAD -> refs/heads/master)
//!
//! Only one level of symbolic indirection is supported. A symbolic ref whose
//! target is itself symbolic is reported as an error, never followed.
//!
//! ## File Format
//!
//! One file per reference under the metadata directory, containing either:
//! - A 40-character SHA-1 hash (direct reference)
//! - `ref: <name>` (symbolic reference)
//! - nothing (direct reference without a target)

use crate::artifacts::branch::branch_name::{BranchName, SymRefName};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::DagitError;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::collections::HashMap;
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;
use walkdir::WalkDir;

/// Prefix marking a symbolic reference
const SYMREF_PREFIX: &str = "ref: ";

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

/// Value of a reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RefTarget {
    /// Points at another reference
    Symbolic(SymRefName),
    /// Points at an object, or at nothing yet
    Direct(Option<ObjectId>),
}

impl RefTarget {
    pub fn oid(&self) -> Option<&ObjectId> {
        match self {
            RefTarget::Direct(oid) => oid.as_ref(),
            RefTarget::Symbolic(_) => None,
        }
    }

    pub fn into_oid(self) -> Option<ObjectId> {
        match self {
            RefTarget::Direct(oid) => oid,
            RefTarget::Symbolic(_) => None,
        }
    }

    pub fn is_symbolic(&self) -> bool {
        matches!(self, RefTarget::Symbolic(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, RefTarget::Direct(None))
    }

    fn read_ref_file(path: &Path) -> anyhow::Result<RefTarget> {
        if !path.is_file() {
            return Ok(RefTarget::Direct(None));
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read ref file at {:?}", path))?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(RefTarget::Direct(None));
        }

        if let Some(target) = content.strip_prefix(SYMREF_PREFIX) {
            Ok(RefTarget::Symbolic(SymRefName::try_parse(target)?))
        } else {
            let oid = ObjectId::try_parse(content.to_string())
                .with_context(|| format!("invalid ref content in {:?}", path))?;
            Ok(RefTarget::Direct(Some(oid)))
        }
    }

    fn to_file_content(&self) -> String {
        match self {
            RefTarget::Symbolic(target) => format!("{SYMREF_PREFIX}{target}"),
            RefTarget::Direct(Some(oid)) => oid.to_string(),
            RefTarget::Direct(None) => String::new(),
        }
    }
}

impl std::fmt::Display for RefTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefTarget::Symbolic(target) => write!(f, "ref: {target}"),
            RefTarget::Direct(Some(oid)) => write!(f, "{oid}"),
            RefTarget::Direct(None) => write!(f, "(none)"),
        }
    }
}

/// References manager rooted at the metadata directory
#[derive(Debug, new)]
pub struct Refs {
    path: Box<Path>,
}

impl Refs {
    /// Read a reference
    ///
    /// With `deref`, a symbolic reference is resolved one level and the value
    /// of its target is returned. A missing reference reads as `Direct(None)`.
    pub fn get_ref(&self, name: &SymRefName, deref: bool) -> anyhow::Result<RefTarget> {
        let raw = self.read_raw(name)?;

        match raw {
            RefTarget::Symbolic(target) if deref => self.read_symref_target(name, &target),
            raw => Ok(raw),
        }
    }

    /// Write a reference
    ///
    /// With `deref`, a write through a symbolic reference lands on its target
    /// instead (e.g. committing on a branch advances the branch, not HEAD).
    pub fn update_ref(
        &self,
        name: &SymRefName,
        target: RefTarget,
        deref: bool,
    ) -> anyhow::Result<()> {
        let location = match self.read_raw(name)? {
            RefTarget::Symbolic(symref_target) if deref => {
                self.read_symref_target(name, &symref_target)?;
                symref_target
            }
            _ => name.clone(),
        };

        tracing::debug!(name = %location, value = %target, "updating ref");
        self.update_ref_file(&location, target.to_file_content())
    }

    /// Enumerate HEAD and every ref under `refs/`, optionally only those whose
    /// name starts with `prefix`
    ///
    /// The walk is lazy and sorted by name; each call starts from scratch.
    pub fn iter_refs<'a>(
        &'a self,
        prefix: Option<&'a str>,
        deref: bool,
    ) -> impl Iterator<Item = anyhow::Result<(SymRefName, RefTarget)>> + 'a {
        let refs_path = self.refs_path();
        let nested_refs = refs_path
            .is_dir()
            .then(|| WalkDir::new(&refs_path).sort_by_file_name())
            .into_iter()
            .flatten()
            .filter_map(move |entry| match entry {
                Ok(entry) if entry.file_type().is_file() => Some(self.ref_name_of(entry.path())),
                Ok(_) => None,
                Err(err) => Some(Err(err.into())),
            });

        std::iter::once(Ok(SymRefName::head()))
            .chain(nested_refs)
            .filter(move |name| match (name, prefix) {
                (Ok(name), Some(prefix)) => name.as_ref_path().starts_with(prefix),
                _ => true,
            })
            .map(move |name| -> anyhow::Result<(SymRefName, RefTarget)> {
                let name = name?;
                let target = self.get_ref(&name, deref)?;
                Ok((name, target))
            })
    }

    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        Ok(self.get_ref(&SymRefName::head(), true)?.into_oid())
    }

    /// Advance whatever HEAD resolves to
    pub fn update_head(&self, oid: ObjectId) -> anyhow::Result<()> {
        self.update_ref(&SymRefName::head(), RefTarget::Direct(Some(oid)), true)
    }

    /// Redefine HEAD itself
    pub fn set_head(&self, target: RefTarget) -> anyhow::Result<()> {
        self.update_ref(&SymRefName::head(), target, false)
    }

    /// Branch HEAD is attached to, or None when detached
    ///
    /// HEAD pointing at a ref outside `refs/heads/` is not on any branch.
    pub fn current_branch(&self) -> anyhow::Result<Option<BranchName>> {
        match self.get_ref(&SymRefName::head(), false)? {
            RefTarget::Symbolic(target) if target.branch_name().is_some() => {
                Ok(Some(BranchName::try_parse_sym_ref_name(&target)?))
            }
            _ => Ok(None),
        }
    }

    /// Whether `refs/heads/<name>` exists and points at something
    pub fn is_branch(&self, name: &str) -> anyhow::Result<bool> {
        let Ok(branch_name) = BranchName::try_parse(name.to_string()) else {
            return Ok(false);
        };

        Ok(!self
            .get_ref(&SymRefName::branch(&branch_name), true)?
            .is_absent())
    }

    pub fn create_branch(&self, name: &BranchName, source_oid: ObjectId) -> anyhow::Result<()> {
        self.create_ref(SymRefName::branch(name), source_oid)
    }

    pub fn create_tag(&self, name: &BranchName, oid: ObjectId) -> anyhow::Result<()> {
        self.create_ref(SymRefName::tag(name), oid)
    }

    pub fn list_branches(&self) -> anyhow::Result<Vec<BranchName>> {
        self.iter_refs(Some(crate::artifacts::branch::HEADS_PREFIX), false)
            .map(|entry| BranchName::try_parse_sym_ref_name(&entry?.0))
            .collect()
    }

    /// Map every object ID to the refs (HEAD included) that resolve to it
    pub fn reverse_refs(&self) -> anyhow::Result<HashMap<ObjectId, Vec<SymRefName>>> {
        let mut reverse_refs: HashMap<ObjectId, Vec<SymRefName>> = HashMap::new();

        for entry in self.iter_refs(None, true) {
            let (name, target) = entry?;
            if let Some(oid) = target.into_oid() {
                reverse_refs.entry(oid).or_default().push(name);
            }
        }

        Ok(reverse_refs)
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }

    pub fn tags_path(&self) -> Box<Path> {
        self.refs_path().join("tags").into_boxed_path()
    }

    fn create_ref(&self, name: SymRefName, oid: ObjectId) -> anyhow::Result<()> {
        // check whether another ref with the same name already exists
        if !self.get_ref(&name, false)?.is_absent() {
            anyhow::bail!(DagitError::RefAlreadyExists(name.to_string()));
        }

        self.update_ref(&name, RefTarget::Direct(Some(oid)), true)
    }

    fn read_raw(&self, name: &SymRefName) -> anyhow::Result<RefTarget> {
        RefTarget::read_ref_file(&self.path.join(name.as_ref_path()))
    }

    fn read_symref_target(
        &self,
        name: &SymRefName,
        target: &SymRefName,
    ) -> anyhow::Result<RefTarget> {
        match self.read_raw(target)? {
            RefTarget::Symbolic(_) => Err(DagitError::NestedSymbolicRef {
                name: name.to_string(),
                target: target.to_string(),
            }
            .into()),
            value => Ok(value),
        }
    }

    fn ref_name_of(&self, path: &Path) -> anyhow::Result<SymRefName> {
        let relative_path = path.strip_prefix(&self.path)?;
        let name = relative_path
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        SymRefName::try_parse(name)
    }

    fn update_ref_file(&self, name: &SymRefName, raw_ref: String) -> anyhow::Result<()> {
        let path = self.path.join(name.as_ref_path());

        // create all the parent directories if they don't exist
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!(
                "failed to create parent directories for ref file at {:?}",
                path
            )
        })?)?;

        // open the ref file as WRONLY and CREAT, then lock it before truncating
        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .with_context(|| format!("failed to open ref file at {:?}", path))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().set_len(0)?;
        lock.deref_mut().write_all(raw_ref.as_bytes())?;

        Ok(())
    }
}
