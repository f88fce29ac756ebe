//! Workflow controller scenarios against the in-memory storage client
//!
//! These tests drive the controller the way the presentation layer does and
//! check the state it exposes after every action.

use ipfs_storage::testing::{MockCall, MockStorageClient};
use ipfs_storage::{
    Cid, FileBlob, RetrievedResponse, StorageError, WorkflowController, WorkflowState,
    MSG_NO_CID, MSG_NO_FILE, MSG_RETRIEVE_FAILED, MSG_UPLOAD_FAILED,
};
use std::sync::Arc;
use tokio_test::{assert_pending, assert_ready};

const PUBLIC_ROOT: &str = "https://ipfs.io/ipfs/";

fn controller() -> WorkflowController<MockStorageClient> {
    let _ = env_logger::builder().is_test(true).try_init();
    WorkflowController::new(MockStorageClient::new(), PUBLIC_ROOT)
}

fn report() -> FileBlob {
    FileBlob::new("report.pdf", b"%PDF-1.7 report".to_vec())
}

#[tokio::test]
async fn test_upload_without_file_issues_no_call() {
    let controller = controller();

    controller.upload().await;

    let state = controller.state();
    assert_eq!(state.error_message, MSG_NO_FILE);
    assert!(!state.is_loading);
    assert_eq!(controller.client().call_count(), 0);
}

#[tokio::test]
async fn test_retrieve_without_cid_issues_no_call() {
    let controller = controller();
    controller.select_file(report());

    controller.retrieve().await;

    let state = controller.state();
    assert_eq!(state.error_message, MSG_NO_CID);
    assert!(state.retrieved.is_none());
    assert_eq!(controller.client().call_count(), 0);
}

#[tokio::test]
async fn test_upload_link_uses_public_gateway() {
    let controller = controller();
    controller.client().push_store(Ok(Cid::new("QmAbc123")));
    controller.select_file(report());

    assert_eq!(controller.upload_link(), None);
    controller.upload().await;

    assert_eq!(
        controller.upload_link().as_deref(),
        Some("https://ipfs.io/ipfs/QmAbc123")
    );
    assert_eq!(
        controller.client().calls(),
        vec![MockCall::Store(vec!["report.pdf".to_string()])]
    );
}

#[tokio::test]
async fn test_failed_upload_keeps_previous_cid() {
    let controller = controller();
    controller.client().push_store(Ok(Cid::new("QmOld")));
    controller
        .client()
        .push_store(Err(StorageError::upload_error("status 401")));
    controller.select_file(report());

    controller.upload().await;
    controller.upload().await;

    let state = controller.state();
    assert_eq!(state.error_message, MSG_UPLOAD_FAILED);
    assert_eq!(state.cid.as_str(), "QmOld");
    assert!(!state.is_loading);
}

#[tokio::test]
async fn test_new_action_clears_previous_error() {
    let controller = controller();
    controller
        .client()
        .push_store(Err(StorageError::upload_error("status 500")));
    controller.client().push_store(Ok(Cid::new("Qm2")));
    controller.select_file(report());

    controller.upload().await;
    assert_eq!(controller.state().error_message, MSG_UPLOAD_FAILED);

    controller.upload().await;
    let state = controller.state();
    assert!(state.error_message.is_empty());
    assert_eq!(state.cid.as_str(), "Qm2");
}

#[tokio::test]
async fn test_loading_flag_during_successful_retrieve() {
    let controller = controller();
    controller.client().push_store(Ok(Cid::new("Qm1")));
    controller
        .client()
        .push_retrieve(Ok(RetrievedResponse::new(b"content".to_vec())));
    controller.select_file(report());
    controller.upload().await;

    controller.client().hold();
    let mut retrieve = tokio_test::task::spawn(controller.retrieve());
    assert_pending!(retrieve.poll());

    let pending = controller.state();
    assert!(pending.is_loading);
    assert!(!pending.can_retrieve());
    assert!(!pending.can_upload());

    controller.client().release();
    assert_ready!(retrieve.poll());
    drop(retrieve);

    let settled = controller.state();
    assert!(!settled.is_loading);
    assert!(settled.retrieved.is_some());
}

#[tokio::test]
async fn test_loading_flag_during_failed_upload() {
    let controller = controller();
    controller
        .client()
        .push_store(Err(StorageError::upload_error("status 503")));
    controller.select_file(report());

    controller.client().hold();
    let mut upload = tokio_test::task::spawn(controller.upload());
    assert_pending!(upload.poll());
    assert!(controller.state().is_loading);
    assert_eq!(controller.client().call_count(), 1);

    controller.client().release();
    assert_ready!(upload.poll());
    drop(upload);

    let state = controller.state();
    assert!(!state.is_loading);
    assert_eq!(state.error_message, MSG_UPLOAD_FAILED);
}

#[tokio::test]
async fn test_loading_flag_during_failed_retrieve() {
    let controller = controller();
    controller.client().push_store(Ok(Cid::new("Qm1")));
    controller
        .client()
        .push_retrieve(Err(StorageError::retrieval_error("status 504")));
    controller.select_file(report());
    controller.upload().await;

    controller.client().hold();
    let mut retrieve = tokio_test::task::spawn(controller.retrieve());
    assert_pending!(retrieve.poll());

    let pending = controller.state();
    assert!(pending.is_loading);
    assert!(pending.error_message.is_empty());

    controller.client().release();
    assert_ready!(retrieve.poll());
    drop(retrieve);

    let settled = controller.state();
    assert!(!settled.is_loading);
    assert_eq!(settled.error_message, MSG_RETRIEVE_FAILED);
    assert!(settled.retrieved.is_none());
}

#[tokio::test]
async fn test_reset_while_upload_settles_discards_cid() {
    let controller = Arc::new(controller());
    controller.client().push_store(Ok(Cid::new("QmStale")));
    controller.select_file(report());

    let weak = Arc::downgrade(&controller);
    controller.client().on_settle(move || {
        if let Some(controller) = weak.upgrade() {
            controller.reset();
        }
    });

    controller.upload().await;

    assert_eq!(controller.state(), WorkflowState::default());
    assert_eq!(controller.upload_link(), None);
}

#[tokio::test]
async fn test_reset_while_retrieve_settles_discards_artifact() {
    let controller = Arc::new(controller());
    controller.client().push_store(Ok(Cid::new("Qm1")));
    controller
        .client()
        .push_retrieve(Ok(RetrievedResponse::new(b"stale".to_vec())));
    controller.select_file(report());
    controller.upload().await;

    let weak = Arc::downgrade(&controller);
    controller.client().on_settle(move || {
        if let Some(controller) = weak.upgrade() {
            controller.reset();
        }
    });

    controller.retrieve().await;

    let state = controller.state();
    assert_eq!(state, WorkflowState::default());
    assert_eq!(controller.live_artifacts(), 0);
    assert_eq!(controller.artifact_bytes(), None);
}

#[tokio::test]
async fn test_retrieve_twice_yields_independent_artifacts() {
    let controller = controller();
    controller.client().push_store(Ok(Cid::new("Qm1")));
    controller
        .client()
        .push_retrieve(Ok(RetrievedResponse::new(b"first".to_vec())));
    controller
        .client()
        .push_retrieve(Ok(RetrievedResponse::new(b"second".to_vec())));
    controller.select_file(report());
    controller.upload().await;

    controller.retrieve().await;
    let first = controller.state().retrieved.unwrap();
    controller.retrieve().await;
    let second = controller.state().retrieved.unwrap();

    assert_ne!(first.url, second.url);
    assert_ne!(first.sha256, second.sha256);
    assert_eq!(controller.artifact_bytes().unwrap().as_ref(), b"second");
    // the first reference was released when the second was created
    assert_eq!(controller.live_artifacts(), 1);

    let retrieves = controller
        .client()
        .calls()
        .into_iter()
        .filter(|call| matches!(call, MockCall::Retrieve(_)))
        .count();
    assert_eq!(retrieves, 2);
}

#[tokio::test]
async fn test_failed_retrieve_message() {
    let controller = controller();
    controller.client().push_store(Ok(Cid::new("Qm1")));
    controller
        .client()
        .push_retrieve(Err(StorageError::retrieval_error("status 404")));
    controller.select_file(report());
    controller.upload().await;

    controller.retrieve().await;

    let state = controller.state();
    assert_eq!(state.error_message, MSG_RETRIEVE_FAILED);
    assert!(state.retrieved.is_none());
    assert!(!state.is_loading);
}

#[tokio::test]
async fn test_cancel_settles_pending_upload() {
    let controller = controller();
    controller.client().push_store(Ok(Cid::new("QmNever")));
    controller.select_file(report());

    controller.client().hold();
    let mut upload = tokio_test::task::spawn(controller.upload());
    assert_pending!(upload.poll());
    assert!(controller.state().is_loading);

    controller.cancel();
    assert_ready!(upload.poll());
    drop(upload);

    let state = controller.state();
    assert!(!state.is_loading);
    assert!(state.error_message.is_empty());
    assert!(state.cid.is_empty());
}

#[tokio::test]
async fn test_subscribers_observe_transitions() {
    let controller = controller();
    controller.client().push_store(Ok(Cid::new("Qm1")));
    let mut updates = controller.subscribe();

    controller.select_file(report());
    assert!(updates.has_changed().unwrap());
    assert!(updates.borrow_and_update().selected_file.is_some());

    controller.upload().await;
    assert!(updates.has_changed().unwrap());
    assert_eq!(updates.borrow_and_update().cid.as_str(), "Qm1");
}

#[tokio::test]
async fn test_end_to_end_report() -> Result<(), Box<dyn std::error::Error>> {
    let controller = controller();
    controller.client().push_store(Ok(Cid::new("Qm123")));
    controller.client().push_retrieve(Ok(
        RetrievedResponse::new(b"%PDF-...".to_vec()).content_type("application/pdf")
    ));

    controller.select_file(report());
    controller.upload().await;
    assert_eq!(
        controller.upload_link().as_deref(),
        Some("https://ipfs.io/ipfs/Qm123")
    );

    controller.retrieve().await;
    assert_eq!(controller.download_label().as_deref(), Some("report.pdf"));

    let state = controller.state();
    let artifact = state.retrieved.as_ref().unwrap();
    assert_eq!(artifact.content_type.as_deref(), Some("application/pdf"));

    let dir = tempfile::tempdir()?;
    let output = dir.path().join("report.pdf");
    let written = controller.save_artifact(&output).await?;
    assert_eq!(written, 8);
    assert_eq!(std::fs::read(&output)?, b"%PDF-...");

    controller.reset();
    assert_eq!(controller.state(), WorkflowState::default());
    assert_eq!(controller.live_artifacts(), 0);

    Ok(())
}
