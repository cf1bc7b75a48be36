use mockall::Sequence;
use nexus_upload_core::contract::{MockUploader, UploadError};
use nexus_upload_core::delegation::ResolvedDelegation;
use nexus_upload_core::orchestrate::{run_uploads, EntryOutcome};
use nexus_upload_core::reaction::LocalFileDoesNotExistReaction;
use std::path::{Path, PathBuf};

fn delegations() -> Vec<ResolvedDelegation> {
    ["a.txt", "b.txt", "c.txt"]
        .into_iter()
        .map(|name| ResolvedDelegation {
            src: PathBuf::from(name),
            dest: format!("remote/{name}"),
        })
        .collect()
}

fn missing(path: &Path) -> UploadError {
    UploadError::LocalFileMissing {
        path: path.to_path_buf(),
    }
}

/// Scripts A → ok, B → `b_result`, C → ok (if `expect_c`), enforcing call order.
fn scripted_uploader(
    b_result: fn(&Path) -> Result<(), UploadError>,
    expect_c: bool,
) -> MockUploader {
    let mut uploader = MockUploader::new();
    let mut seq = Sequence::new();

    uploader
        .expect_upload_file()
        .withf(|src, dest| src == Path::new("a.txt") && dest == "remote/a.txt")
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(()));
    uploader
        .expect_upload_file()
        .withf(|src, dest| src == Path::new("b.txt") && dest == "remote/b.txt")
        .times(1)
        .in_sequence(&mut seq)
        .returning(move |src, _| b_result(src));
    uploader
        .expect_upload_file()
        .withf(|src, _| src == Path::new("c.txt"))
        .times(if expect_c { 1 } else { 0 })
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(()));

    uploader
}

#[tokio::test]
async fn all_uploads_succeed_in_order() {
    let mut uploader = MockUploader::new();
    let mut seq = Sequence::new();
    for name in ["a.txt", "b.txt", "c.txt"] {
        uploader
            .expect_upload_file()
            .withf(move |src, _| src == Path::new(name))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
    }

    let report = run_uploads(&delegations(), LocalFileDoesNotExistReaction::Fail, &uploader)
        .await
        .expect("run should succeed");

    assert_eq!(report.outcomes(), vec![EntryOutcome::Succeeded; 3]);
}

#[tokio::test]
async fn fail_policy_aborts_on_missing_file_and_never_attempts_the_rest() {
    let uploader = scripted_uploader(|src| Err(missing(src)), false);

    let aborted = run_uploads(&delegations(), LocalFileDoesNotExistReaction::Fail, &uploader)
        .await
        .expect_err("missing file must abort under fail");

    assert!(aborted.source.is_local_file_missing());
    assert_eq!(aborted.delegation.src, PathBuf::from("b.txt"));
    assert_eq!(
        aborted.report.outcomes(),
        vec![
            EntryOutcome::Succeeded,
            EntryOutcome::AbortedFatal,
            EntryOutcome::Pending
        ]
    );
    assert!(aborted.to_string().contains("b.txt"), "{aborted}");
}

#[tokio::test]
async fn warn_and_ignore_skips_missing_file_and_continues() {
    let uploader = scripted_uploader(|src| Err(missing(src)), true);

    let report = run_uploads(
        &delegations(),
        LocalFileDoesNotExistReaction::WarnAndIgnore,
        &uploader,
    )
    .await
    .expect("missing file is not fatal under warn-and-ignore");

    assert_eq!(
        report.outcomes(),
        vec![
            EntryOutcome::Succeeded,
            EntryOutcome::SkippedWarned,
            EntryOutcome::Succeeded
        ]
    );
}

#[tokio::test]
async fn ignore_skips_missing_file_silently() {
    let uploader = scripted_uploader(|src| Err(missing(src)), true);

    let report = run_uploads(&delegations(), LocalFileDoesNotExistReaction::Ignore, &uploader)
        .await
        .expect("missing file is not fatal under ignore");

    assert_eq!(report.count(EntryOutcome::Skipped), 1);
    assert_eq!(report.count(EntryOutcome::Succeeded), 2);
}

#[tokio::test]
async fn other_upload_errors_abort_under_every_policy() {
    for policy in LocalFileDoesNotExistReaction::ALL {
        let uploader = scripted_uploader(
            |_| {
                Err(UploadError::Rejected {
                    dest: "remote/b.txt".to_string(),
                    status: 401,
                    body: "Unauthorized".to_string(),
                })
            },
            false,
        );

        let aborted = run_uploads(&delegations(), policy, &uploader)
            .await
            .expect_err("rejection is always fatal");

        assert!(
            matches!(aborted.source, UploadError::Rejected { status: 401, .. }),
            "policy {policy}: {:?}",
            aborted.source
        );
        assert_eq!(aborted.report.count(EntryOutcome::Pending), 1, "policy {policy}");
    }
}

#[tokio::test]
async fn empty_input_produces_empty_report() {
    let uploader = MockUploader::new();
    let report = run_uploads(&[], LocalFileDoesNotExistReaction::Fail, &uploader)
        .await
        .unwrap();
    assert!(report.entries.is_empty());
}

#[tokio::test]
async fn report_serialises_for_debug_output() {
    let uploader = scripted_uploader(|src| Err(missing(src)), true);
    let report = run_uploads(
        &delegations(),
        LocalFileDoesNotExistReaction::WarnAndIgnore,
        &uploader,
    )
    .await
    .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["entries"][1]["outcome"], "skipped_warned");
    assert_eq!(json["entries"][1]["delegation"]["dest"], "remote/b.txt");
}
