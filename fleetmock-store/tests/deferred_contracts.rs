#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use fleetmock_core::{Group, StoreError};
use fleetmock_store::{MockDelays, StoreHandle};
use serde_json::json;
use tokio::time::{sleep, Duration};

#[tokio::test(start_paused = true)]
async fn host_create_lands_after_one_second() {
    let store = StoreHandle::spawn(MockDelays::default());
    assert_eq!(store.hosts("us-central1-a").await.unwrap().len(), 2);

    let gcp = json!({"machine_type": "n1-standard-4", "min_cpu_platform": ""});
    let op = store.create_host("us-central1-a", gcp.clone()).await.unwrap();
    assert_eq!(op.name.len(), 15);
    assert!(!op.done);
    assert!(op
        .name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));

    // Accepted but not yet applied.
    assert_eq!(store.hosts("us-central1-a").await.unwrap().len(), 2);

    sleep(Duration::from_millis(1100)).await;

    let hosts = store.hosts("us-central1-a").await.unwrap();
    assert_eq!(hosts.len(), 3);
    assert_eq!(hosts[2].gcp, gcp);
    assert_eq!(hosts[2].name.len(), 5);
    assert!(hosts[2]
        .name
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
}

#[tokio::test(start_paused = true)]
async fn host_delete_lands_after_one_second() {
    let store = StoreHandle::spawn(MockDelays::default());

    store.delete_host("us-central1-a", "us-host1").await.unwrap();
    assert_eq!(store.hosts("us-central1-a").await.unwrap().len(), 2);

    sleep(Duration::from_secs(2)).await;

    let hosts = store.hosts("us-central1-a").await.unwrap();
    assert_eq!(hosts.len(), 1);
    assert_eq!(hosts[0].name, "us-host2");
}

#[tokio::test(start_paused = true)]
async fn group_create_lands_after_three_seconds() {
    let store = StoreHandle::spawn(MockDelays::default());
    let group: Group = serde_json::from_value(json!({
        "name": "group-cli",
        "cvds": [{
            "name": "cvd-1",
            "build_source": {},
            "status": "running",
            "displays": [],
            "group_name": "group-cli"
        }]
    }))
    .unwrap();

    let op = store
        .create_group("us-central1-a", "us-host2", group)
        .await
        .unwrap();
    assert!(!op.done);

    sleep(Duration::from_secs(2)).await;
    assert!(store.groups("us-central1-a", "us-host2").await.unwrap().is_empty());

    sleep(Duration::from_secs(2)).await;
    let groups = store.groups("us-central1-a", "us-host2").await.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name, "group-cli");
    assert_eq!(groups[0].cvds.len(), 1);
    assert_eq!(groups[0].cvds[0].status, "running");
}

#[tokio::test(start_paused = true)]
async fn group_delete_lands_after_ten_seconds_and_takes_one_group() {
    let store = StoreHandle::spawn(MockDelays::default());

    store
        .delete_group("ap-northeast2-c", "ap-host2", "group-2")
        .await
        .unwrap();

    sleep(Duration::from_secs(9)).await;
    assert_eq!(store.groups("ap-northeast2-c", "ap-host2").await.unwrap().len(), 3);

    sleep(Duration::from_secs(2)).await;
    let names: Vec<String> = store
        .groups("ap-northeast2-c", "ap-host2")
        .await
        .unwrap()
        .iter()
        .map(|g| g.name.clone())
        .collect();
    assert_eq!(names, ["group-1", "group-3"]);
}

#[tokio::test(start_paused = true)]
async fn rejected_mutations_schedule_nothing() {
    let store = StoreHandle::spawn(MockDelays::default());

    let err = store.delete_host("us-central1-a", "ghost").await.unwrap_err();
    assert_eq!(err, StoreError::HostNotFound("ghost".to_string()));

    let err = store.create_host("eu-west1-b", json!({})).await.unwrap_err();
    assert_eq!(err, StoreError::ZoneNotFound("eu-west1-b".to_string()));

    let err = store
        .delete_group("us-central1-a", "us-host2", "group-1")
        .await
        .unwrap_err();
    assert_eq!(err, StoreError::GroupNotFound("group-1".to_string()));

    let err = store.groups("us-central1-a", "ghost").await.unwrap_err();
    assert_eq!(err, StoreError::HostNotFound("ghost".to_string()));

    // Past every configured delay: nothing may have landed.
    sleep(Duration::from_secs(11)).await;

    assert_eq!(store.hosts("us-central1-a").await.unwrap().len(), 2);
    assert!(store.groups("us-central1-a", "us-host2").await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn deferred_deletes_resolve_names_at_apply_time() {
    let store = StoreHandle::spawn(MockDelays::default());

    // The group delete lands at t+10s, the host delete at t+1s. By the time
    // the group delete fires its host is gone and it must fizzle quietly.
    store
        .delete_group("us-central1-a", "us-host1", "group-1")
        .await
        .unwrap();
    store.delete_host("us-central1-a", "us-host1").await.unwrap();

    sleep(Duration::from_secs(11)).await;

    let hosts = store.hosts("us-central1-a").await.unwrap();
    assert_eq!(hosts.len(), 1);
    assert_eq!(hosts[0].name, "us-host2");
}

#[tokio::test(start_paused = true)]
async fn reset_restores_seed_immediately() {
    let store = StoreHandle::spawn(MockDelays::default());

    store.create_host("us-central1-a", json!({"machine_type": "c2"})).await.unwrap();
    sleep(Duration::from_secs(2)).await;
    assert_eq!(store.hosts("us-central1-a").await.unwrap().len(), 3);

    store.reset().await.unwrap();

    assert_eq!(store.zones().await.unwrap(), ["us-central1-a", "ap-northeast2-c"]);
    assert_eq!(store.hosts("us-central1-a").await.unwrap().len(), 2);

    let group_names: Vec<String> = store
        .groups("ap-northeast2-c", "ap-host2")
        .await
        .unwrap()
        .iter()
        .map(|g| g.name.clone())
        .collect();
    assert_eq!(group_names, ["group-1", "group-2", "group-3"]);
}

#[tokio::test(start_paused = true)]
async fn pending_mutation_lands_on_the_reset_tree() {
    let store = StoreHandle::spawn(MockDelays::default());

    store.create_host("us-central1-a", json!({"machine_type": "n2"})).await.unwrap();
    store.reset().await.unwrap();
    assert_eq!(store.hosts("us-central1-a").await.unwrap().len(), 2);

    sleep(Duration::from_secs(2)).await;

    let hosts = store.hosts("us-central1-a").await.unwrap();
    assert_eq!(hosts.len(), 3);
    assert_eq!(hosts[2].gcp, json!({"machine_type": "n2"}));
}

#[tokio::test(start_paused = true)]
async fn listings_reflect_seed_data() {
    let store = StoreHandle::spawn(MockDelays::default());

    assert_eq!(store.zones().await.unwrap(), ["us-central1-a", "ap-northeast2-c"]);

    let hosts = store.hosts("ap-northeast2-c").await.unwrap();
    let names: Vec<&str> = hosts.iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, ["ap-host1", "ap-host2"]);

    let groups = store.groups("ap-northeast2-c", "ap-host2").await.unwrap();
    assert_eq!(groups.len(), 3);
    for group in &groups {
        assert_eq!(group.cvds.len(), 2);
        for cvd in &group.cvds {
            assert_eq!(cvd.status, "done");
            assert_eq!(cvd.group_name, group.name);
        }
    }
}
