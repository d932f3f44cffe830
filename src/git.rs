// ABOUTME: Git repository detection for the skip-git-repo-check safety default
//
// codex refuses to run outside a git work tree unless told otherwise. The
// wrapper only needs a yes/no answer, and any failure is treated as "no".

use git2::Repository;
use std::path::Path;
use tracing::debug;

/// Check whether `path` is inside a git work tree
pub fn is_inside_work_tree(path: &Path) -> bool {
    match Repository::discover(path) {
        Ok(repo) => !repo.is_bare(),
        Err(e) => {
            debug!("{} is not inside a git repository: {}", path.display(), e.message());
            false
        }
    }
}
