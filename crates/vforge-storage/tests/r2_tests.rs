//! Live R2 tests. Run with `--ignored` and R2_* variables set (a `.env` file works).

use chrono::Utc;
use std::sync::Arc;
use vforge_models::{ArtifactName, Operation};
use vforge_storage::{ArtifactPublisher, ArtifactStore, R2Client};

fn client() -> R2Client {
    dotenvy::dotenv().ok();
    R2Client::from_env().expect("R2 environment variables must be set")
}

#[tokio::test]
#[ignore = "requires R2 credentials"]
async fn r2_connectivity() {
    client().check_connectivity().await.unwrap();
}

#[tokio::test]
#[ignore = "requires R2 credentials"]
async fn r2_publish_list_delete() {
    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("artifact.mp4");
    std::fs::write(&local, b"integration-test").unwrap();

    let store = Arc::new(client());
    let publisher = ArtifactPublisher::new(store.clone());
    let name = ArtifactName::generate(Operation::Trim, Utc::now());

    let url = publisher.publish(&local, &name).await.unwrap();
    assert!(url.starts_with("http"));
    assert!(url.contains(name.as_str()));

    let listed = store.list_objects().await.unwrap();
    let object = listed
        .iter()
        .find(|o| o.key == name.as_str())
        .expect("published object should be listed");
    assert_eq!(object.size, 16);
    assert!(object.last_modified.is_some());

    store
        .delete_objects(&[name.as_str().to_string()])
        .await
        .unwrap();
}
