//! Disable and Enable specs

use crate::prelude::*;

#[tokio::test]
async fn disable_denies_every_queued_request() {
    let cluster = single_node(&["Printer_0"]).await;
    let mut holder = cluster.client("h").unwrap();
    let mut queued = vec![
        cluster.client("u1").unwrap(),
        cluster.client("u2").unwrap(),
        cluster.client("u3").unwrap(),
    ];
    let mut admin = cluster.client("admin").unwrap();

    holder
        .access(&addr("m0"), "Printer_0", AccessMode::WriteBlocking)
        .await
        .unwrap();
    for user in &queued {
        request(user, "m0", "Printer_0", AccessMode::WriteBlocking).await;
    }

    let reply = admin
        .manage(&addr("m0"), "Printer_0", ManagementKind::Disable)
        .await
        .unwrap();
    assert!(is_management_granted(&reply));
    for user in &mut queued {
        assert_eq!(
            access_denial(&user.recv().await.unwrap()),
            Some(AccessDenialReason::Disabled)
        );
    }
}

#[tokio::test]
async fn draining_resource_refuses_new_nonblocking_access() {
    let cluster = single_node(&["Printer_0"]).await;
    let mut holder = cluster.client("h").unwrap();
    let mut late = cluster.client("late").unwrap();
    let mut admin = cluster.client("admin").unwrap();

    holder
        .access(&addr("m0"), "Printer_0", AccessMode::ReadBlocking)
        .await
        .unwrap();
    admin
        .manage(&addr("m0"), "Printer_0", ManagementKind::Disable)
        .await
        .unwrap();

    let reply = late
        .access(&addr("m0"), "Printer_0", AccessMode::ReadNonBlocking)
        .await
        .unwrap();
    assert_eq!(access_denial(&reply), Some(AccessDenialReason::Busy));

    holder
        .release(&addr("m0"), "Printer_0", AccessKind::Read)
        .await
        .unwrap();
    let reply = late
        .access(&addr("m0"), "Printer_0", AccessMode::ReadNonBlocking)
        .await
        .unwrap();
    assert_eq!(access_denial(&reply), Some(AccessDenialReason::Disabled));
}

#[tokio::test]
async fn enable_makes_resource_available_again() {
    let cluster = single_node(&["Printer_0"]).await;
    let mut user = cluster.client("u1").unwrap();
    let mut admin = cluster.client("admin").unwrap();

    admin
        .manage(&addr("m0"), "Printer_0", ManagementKind::Disable)
        .await
        .unwrap();
    let reply = user
        .access(&addr("m0"), "Printer_0", AccessMode::WriteBlocking)
        .await
        .unwrap();
    assert_eq!(access_denial(&reply), Some(AccessDenialReason::Disabled));

    let reply = admin
        .manage(&addr("m0"), "Printer_0", ManagementKind::Enable)
        .await
        .unwrap();
    assert!(is_management_granted(&reply));

    let reply = user
        .access(&addr("m0"), "Printer_0", AccessMode::WriteBlocking)
        .await
        .unwrap();
    assert!(is_granted(&reply));
}

#[tokio::test]
async fn holder_cannot_disable() {
    let cluster = single_node(&["Printer_0"]).await;
    let mut user = cluster.client("u1").unwrap();

    user.access(&addr("m0"), "Printer_0", AccessMode::ReadBlocking)
        .await
        .unwrap();
    let reply = user
        .manage(&addr("m0"), "Printer_0", ManagementKind::Disable)
        .await
        .unwrap();

    assert_eq!(
        management_denial(&reply),
        Some(ManagementDenialReason::AccessHeld)
    );
}

#[tokio::test]
async fn disable_is_idempotent() {
    let cluster = single_node(&["Printer_0"]).await;
    let mut admin = cluster.client("admin").unwrap();

    for _ in 0..2 {
        let reply = admin
            .manage(&addr("m0"), "Printer_0", ManagementKind::Disable)
            .await
            .unwrap();
        assert!(is_management_granted(&reply));
    }
}
