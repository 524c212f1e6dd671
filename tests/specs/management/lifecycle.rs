//! Add and Remove specs

use crate::prelude::*;

#[tokio::test]
async fn add_disable_remove_round_trip() {
    let cluster = single_node(&[]).await;
    let mut admin = cluster.client("admin").unwrap();
    let mut user = cluster.client("u1").unwrap();

    for kind in [
        ManagementKind::Add,
        ManagementKind::Disable,
        ManagementKind::Remove,
    ] {
        let reply = admin
            .manage(&addr("m0"), "Plotter_0", kind)
            .await
            .unwrap();
        assert!(is_management_granted(&reply), "{kind:?} should be granted");
    }

    let reply = user
        .access(&addr("m0"), "Plotter_0", AccessMode::ReadBlocking)
        .await
        .unwrap();
    assert_eq!(access_denial(&reply), Some(AccessDenialReason::NotFound));

    // The name is free again
    let reply = admin
        .manage(&addr("m0"), "Plotter_0", ManagementKind::Add)
        .await
        .unwrap();
    assert!(is_management_granted(&reply));
}

#[tokio::test]
async fn added_resource_starts_enabled() {
    let cluster = single_node(&[]).await;
    let mut admin = cluster.client("admin").unwrap();
    let mut user = cluster.client("u1").unwrap();

    admin
        .manage(&addr("m0"), "Plotter_0", ManagementKind::Add)
        .await
        .unwrap();
    let reply = user
        .access(&addr("m0"), "Plotter_0", AccessMode::WriteNonBlocking)
        .await
        .unwrap();

    assert!(is_granted(&reply));
}

#[tokio::test]
async fn enabled_resource_cannot_be_removed() {
    let cluster = single_node(&["Printer_0"]).await;
    let mut admin = cluster.client("admin").unwrap();

    let reply = admin
        .manage(&addr("m0"), "Printer_0", ManagementKind::Remove)
        .await
        .unwrap();

    assert_eq!(
        management_denial(&reply),
        Some(ManagementDenialReason::NotDisabled)
    );
}

#[tokio::test]
async fn remove_waits_for_drain() {
    let cluster = single_node(&["Printer_0"]).await;
    let mut holder = cluster.client("h").unwrap();
    let mut admin = cluster.client("admin").unwrap();

    holder
        .access(&addr("m0"), "Printer_0", AccessMode::WriteBlocking)
        .await
        .unwrap();
    admin
        .manage(&addr("m0"), "Printer_0", ManagementKind::Disable)
        .await
        .unwrap();

    let reply = admin
        .manage(&addr("m0"), "Printer_0", ManagementKind::Remove)
        .await
        .unwrap();
    assert_eq!(
        management_denial(&reply),
        Some(ManagementDenialReason::NotDisabled)
    );

    holder
        .release(&addr("m0"), "Printer_0", AccessKind::Write)
        .await
        .unwrap();
    let reply = admin
        .manage(&addr("m0"), "Printer_0", ManagementKind::Remove)
        .await
        .unwrap();
    assert!(is_management_granted(&reply));
}

#[tokio::test]
async fn duplicate_add_is_a_name_clash() {
    let cluster = single_node(&["Printer_0"]).await;
    let mut admin = cluster.client("admin").unwrap();

    let reply = admin
        .manage(&addr("m0"), "Printer_0", ManagementKind::Add)
        .await
        .unwrap();

    assert_eq!(
        management_denial(&reply),
        Some(ManagementDenialReason::NameClash)
    );
}
