//! Shared git fixtures for tests

use git2::{Repository, Signature, Time};
use tempfile::TempDir;

use crate::repository::GitRepo;

/// Build a throwaway repository with one commit per message (oldest
/// first, an hour apart so ordering is deterministic) and lightweight
/// tags pointing at the given commit indices.
pub(crate) fn fixture_repo(messages: &[&str], tags: &[(&str, usize)]) -> (TempDir, GitRepo) {
    let temp = TempDir::new().unwrap();
    let repo = Repository::init(temp.path()).unwrap();

    let base = 1_700_000_000i64;
    let mut oids = Vec::new();

    for (i, message) in messages.iter().enumerate() {
        let time = Time::new(base + (i as i64) * 3600, 0);
        let sig = Signature::new("Test", "test@example.com", &time).unwrap();

        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();

        let parent = oids
            .last()
            .map(|oid| repo.find_commit(*oid).unwrap());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        let oid = repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap();
        oids.push(oid);
    }

    for (name, index) in tags {
        let object = repo.find_object(oids[*index], None).unwrap();
        repo.tag_lightweight(name, &object, false).unwrap();
    }

    drop(repo);
    let git_repo = GitRepo::open(temp.path()).unwrap();
    (temp, git_repo)
}
