use std::fs;
use std::io;
use std::sync::{Arc, Mutex};

use action_docs_core::contract::{
    CommandOutput, MockCommandRunner, MockIdentityProvider, MockOutputSink, OutputSink,
};
use action_docs_core::markers::{END_TAG, START_TAG};
use action_docs_core::publish::{
    publish_as_commit, publish_as_output, write_atomic, CommitOutcome, GithubOutputFile,
    StaticIdentity, COMMIT_MESSAGE,
};
use action_docs_core::DocError;
use tempfile::tempdir;

type Calls = Arc<Mutex<Vec<Vec<String>>>>;

/// A git runner that records every invocation and fails on the command
/// whose first argument equals `fail_on`.
fn recording_git(calls: Calls, fail_on: Option<&'static str>) -> MockCommandRunner {
    let mut git = MockCommandRunner::new();
    git.expect_run().returning(move |program, args| {
        assert_eq!(program, "git");
        calls.lock().unwrap().push(args.to_vec());
        if fail_on == Some(args[0].as_str()) {
            Ok(CommandOutput::failed(1, "rejected"))
        } else {
            Ok(CommandOutput::ok())
        }
    });
    git
}

#[test]
fn commit_runs_git_sequence_with_injected_identity() {
    let dir = tempdir().unwrap();
    let readme = dir.path().join("README.md");
    fs::write(&readme, format!("# Action\n{START_TAG}\n{END_TAG}\n")).unwrap();

    let calls = Calls::default();
    let git = recording_git(calls.clone(), None);
    let identity = StaticIdentity::new("octocat", "github.com");

    let outcome = publish_as_commit("## Inputs\n", &readme, &git, &identity).unwrap();
    assert_eq!(outcome, CommitOutcome::Committed);

    assert_eq!(
        fs::read_to_string(&readme).unwrap(),
        format!("# Action\n{START_TAG}\n## Inputs\n{END_TAG}\n")
    );

    let target = readme.to_string_lossy().into_owned();
    let expected: Vec<Vec<String>> = vec![
        vec!["config", "--local", "user.name", "octocat"],
        vec!["config", "--local", "user.email", "octocat@users.noreply.github.com"],
        vec!["fetch", "--depth=1", "origin", "+refs/tags/*:refs/tags/*"],
        vec!["add", target.as_str()],
        vec!["commit", "-m", COMMIT_MESSAGE],
        vec!["push"],
    ]
    .into_iter()
    .map(|step| step.into_iter().map(String::from).collect())
    .collect();
    assert_eq!(*calls.lock().unwrap(), expected);
}

#[test]
fn commit_stops_at_first_failing_command() {
    let dir = tempdir().unwrap();
    let readme = dir.path().join("README.md");
    fs::write(&readme, format!("{START_TAG}{END_TAG}")).unwrap();

    let calls = Calls::default();
    let git = recording_git(calls.clone(), Some("commit"));
    let identity = StaticIdentity::new("octocat", "github.com");

    let err = publish_as_commit("doc", &readme, &git, &identity).unwrap_err();
    match err {
        DocError::Commit { command, detail } => {
            assert_eq!(command, format!("git commit -m {COMMIT_MESSAGE}"));
            assert!(detail.contains("exit code 1"), "{detail}");
            assert!(detail.contains("rejected"), "{detail}");
        }
        other => panic!("expected Commit error, got {other:?}"),
    }
    let ran: Vec<String> = calls.lock().unwrap().iter().map(|c| c[0].clone()).collect();
    assert_eq!(ran, ["config", "config", "fetch", "add", "commit"]);
}

#[test]
fn commit_reports_spawn_failure() {
    let dir = tempdir().unwrap();
    let readme = dir.path().join("README.md");
    fs::write(&readme, format!("{START_TAG}{END_TAG}")).unwrap();

    let mut git = MockCommandRunner::new();
    git.expect_run()
        .times(1)
        .returning(|_, _| Err(io::Error::new(io::ErrorKind::NotFound, "git not installed")));
    let identity = StaticIdentity::new("octocat", "github.com");

    let err = publish_as_commit("doc", &readme, &git, &identity).unwrap_err();
    assert!(matches!(err, DocError::Commit { ref detail, .. } if detail.contains("git not installed")));
}

#[test]
fn commit_skips_git_when_region_is_current() {
    let dir = tempdir().unwrap();
    let readme = dir.path().join("README.md");
    fs::write(&readme, format!("{START_TAG}\n## Outputs\n{END_TAG}")).unwrap();

    // No expectations: any git call would panic.
    let git = MockCommandRunner::new();
    let identity = MockIdentityProvider::new();

    let outcome = publish_as_commit("## Outputs\n", &readme, &git, &identity).unwrap();
    assert_eq!(outcome, CommitOutcome::Unchanged);
}

#[test]
fn commit_without_identity_leaves_file_untouched() {
    let dir = tempdir().unwrap();
    let readme = dir.path().join("README.md");
    let original = format!("{START_TAG}{END_TAG}");
    fs::write(&readme, &original).unwrap();

    let git = MockCommandRunner::new();
    let mut identity = MockIdentityProvider::new();
    identity
        .expect_actor()
        .returning(|| Err(DocError::Identity("GITHUB_ACTOR environment variable not set".into())));

    let err = publish_as_commit("doc", &readme, &git, &identity).unwrap_err();
    assert!(matches!(err, DocError::Identity(_)));
    assert_eq!(fs::read_to_string(&readme).unwrap(), original);
}

#[test]
fn output_publishes_doc_name() {
    let mut sink = MockOutputSink::new();
    sink.expect_set_output()
        .withf(|name, value| name == "doc" && value == "## Inputs\n")
        .times(1)
        .returning(|_, _| Ok(()));

    publish_as_output("## Inputs\n", &sink).unwrap();
}

#[test]
fn github_output_file_uses_heredoc_block() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("github_output");
    fs::write(&path, "existing=1\n").unwrap();

    let sink = GithubOutputFile::new(&path);
    sink.set_output("doc", "line one\nline two").unwrap();

    let written = fs::read_to_string(&path).unwrap();
    let mut lines = written.lines();
    assert_eq!(lines.next(), Some("existing=1"));
    let header = lines.next().unwrap();
    let delimiter = header.strip_prefix("doc<<").expect("heredoc header");
    assert!(delimiter.starts_with("ghadelimiter_"), "{delimiter}");
    assert_eq!(lines.next(), Some("line one"));
    assert_eq!(lines.next(), Some("line two"));
    assert_eq!(lines.next(), Some(delimiter));
    assert_eq!(lines.next(), None);
}

#[cfg(unix)]
#[test]
fn atomic_write_keeps_mode_and_symlink() {
    use std::os::unix::fs::{symlink, PermissionsExt};

    let dir = tempdir().unwrap();
    let docs = dir.path().join("docs.md");
    fs::write(&docs, "old").unwrap();
    fs::set_permissions(&docs, fs::Permissions::from_mode(0o644)).unwrap();
    let readme = dir.path().join("README.md");
    symlink(&docs, &readme).unwrap();

    write_atomic(&readme, "new").unwrap();

    assert!(fs::symlink_metadata(&readme).unwrap().file_type().is_symlink());
    assert_eq!(fs::read_to_string(&docs).unwrap(), "new");
    let mode = fs::metadata(&docs).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o644);
}
