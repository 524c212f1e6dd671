//! Multi-node specs
//!
//! Any manager accepts requests for any resource it knows about and relays
//! them to the owner; replies come straight from the owner.

use crate::prelude::*;

async fn two_nodes() -> LocalCluster {
    cluster(&[("m0", &["Printer_0"]), ("m1", &["Scanner_0"])]).await
}

#[tokio::test]
async fn access_through_any_manager() {
    let cluster = two_nodes().await;
    let mut u1 = cluster.client("u1").unwrap();
    let mut u2 = cluster.client("u2").unwrap();

    let reply = u1
        .access(&addr("m0"), "Scanner_0", AccessMode::WriteBlocking)
        .await
        .unwrap();
    assert!(is_granted(&reply));

    let reply = u2
        .access(&addr("m1"), "Scanner_0", AccessMode::WriteNonBlocking)
        .await
        .unwrap();
    assert_eq!(access_denial(&reply), Some(AccessDenialReason::Busy));

    // Released through the other manager
    u1.release(&addr("m1"), "Scanner_0", AccessKind::Write)
        .await
        .unwrap();
    let reply = u2
        .access(&addr("m0"), "Scanner_0", AccessMode::WriteBlocking)
        .await
        .unwrap();
    assert!(is_granted(&reply));
}

#[tokio::test]
async fn management_is_forwarded_but_add_and_remove_stay_local() {
    let cluster = two_nodes().await;
    let mut admin = cluster.client("admin").unwrap();

    let reply = admin
        .manage(&addr("m0"), "Scanner_0", ManagementKind::Disable)
        .await
        .unwrap();
    assert!(is_management_granted(&reply));

    let reply = admin
        .manage(&addr("m0"), "Scanner_0", ManagementKind::Remove)
        .await
        .unwrap();
    assert_eq!(
        management_denial(&reply),
        Some(ManagementDenialReason::NotLocal)
    );

    let reply = admin
        .manage(&addr("m0"), "Scanner_0", ManagementKind::Add)
        .await
        .unwrap();
    assert_eq!(
        management_denial(&reply),
        Some(ManagementDenialReason::NameClash)
    );
}

#[tokio::test]
async fn added_and_removed_resources_propagate() {
    let mut cluster = two_nodes().await;
    let mut admin = cluster.client("admin").unwrap();
    let mut user = cluster.client("u1").unwrap();

    admin
        .manage(&addr("m1"), "Plotter_0", ManagementKind::Add)
        .await
        .unwrap();
    cluster.settle().await.unwrap();

    let reply = user
        .access(&addr("m0"), "Plotter_0", AccessMode::ReadNonBlocking)
        .await
        .unwrap();
    assert!(is_granted(&reply));
    user.release(&addr("m0"), "Plotter_0", AccessKind::Read)
        .await
        .unwrap();
    // The release travels through m0; let it land before disabling at m1
    cluster.settle().await.unwrap();

    for kind in [ManagementKind::Disable, ManagementKind::Remove] {
        let reply = admin
            .manage(&addr("m1"), "Plotter_0", kind)
            .await
            .unwrap();
        assert!(is_management_granted(&reply), "{kind:?} should be granted");
    }
    cluster.settle().await.unwrap();

    let reply = user
        .access(&addr("m0"), "Plotter_0", AccessMode::ReadNonBlocking)
        .await
        .unwrap();
    assert_eq!(access_denial(&reply), Some(AccessDenialReason::NotFound));
}

#[tokio::test]
async fn final_state_reflects_discovery() {
    let cluster = two_nodes().await;

    let managers = cluster.shutdown().await.unwrap();

    assert_eq!(managers[0].owner_of("Scanner_0"), Some(&addr("m1")));
    assert_eq!(managers[1].owner_of("Printer_0"), Some(&addr("m0")));
    assert_eq!(managers[0].peers().len(), 1);
}
