use crate::areas::database::Database;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::{HashSet, VecDeque};

/// Breadth-first walk over the commits reachable from a set of starting IDs
///
/// Every reachable commit is yielded exactly once, starting points included.
/// The walk is lazy: a commit is only loaded once the caller asks for the
/// next item after it, so stopping early never touches the rest of history.
pub struct RevList<'r> {
    database: &'r Database,
    queue: VecDeque<ObjectId>,
    visited: HashSet<ObjectId>,
    // yielded but not yet expanded into its parent
    pending: Option<ObjectId>,
}

impl<'r> RevList<'r> {
    pub fn new(database: &'r Database, starts: impl IntoIterator<Item = ObjectId>) -> Self {
        RevList {
            database,
            queue: starts.into_iter().collect(),
            visited: HashSet::new(),
            pending: None,
        }
    }

    fn expand_pending(&mut self) -> anyhow::Result<()> {
        if let Some(commit_oid) = self.pending.take() {
            let commit = self.database.parse_object_as_commit(&commit_oid)?;
            if let Some(parent) = commit.parent() {
                self.queue.push_back(parent.clone());
            }
        }

        Ok(())
    }
}

impl Iterator for RevList<'_> {
    type Item = anyhow::Result<ObjectId>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Err(err) = self.expand_pending() {
            self.queue.clear();
            return Some(Err(err));
        }

        while let Some(commit_oid) = self.queue.pop_front() {
            if !self.visited.insert(commit_oid.clone()) {
                continue;
            }

            self.pending = Some(commit_oid.clone());
            return Some(Ok(commit_oid));
        }

        None
    }
}
