//! Exclusive write access specs
//!
//! One writer at a time; the writer may re-enter.

use crate::prelude::*;

#[tokio::test]
async fn nonblocking_writer_is_denied_until_release() {
    let cluster = single_node(&["Printer_0"]).await;
    let mut u1 = cluster.client("u1").unwrap();
    let mut u2 = cluster.client("u2").unwrap();

    let reply = u1
        .access(&addr("m0"), "Printer_0", AccessMode::WriteBlocking)
        .await
        .unwrap();
    assert!(is_granted(&reply));

    let reply = u2
        .access(&addr("m0"), "Printer_0", AccessMode::WriteNonBlocking)
        .await
        .unwrap();
    assert_eq!(access_denial(&reply), Some(AccessDenialReason::Busy));

    u1.release(&addr("m0"), "Printer_0", AccessKind::Write)
        .await
        .unwrap();

    let reply = u2
        .access(&addr("m0"), "Printer_0", AccessMode::WriteBlocking)
        .await
        .unwrap();
    assert!(is_granted(&reply));
}

#[tokio::test]
async fn blocking_writer_waits_for_release() {
    let cluster = single_node(&["Printer_0"]).await;
    let mut u1 = cluster.client("u1").unwrap();
    let mut u2 = cluster.client("u2").unwrap();

    u1.access(&addr("m0"), "Printer_0", AccessMode::WriteBlocking)
        .await
        .unwrap();
    request(&u2, "m0", "Printer_0", AccessMode::WriteBlocking).await;
    assert_waiting(&mut u2).await;

    u1.release(&addr("m0"), "Printer_0", AccessKind::Write)
        .await
        .unwrap();

    assert!(is_granted(&u2.recv().await.unwrap()));
}

#[tokio::test]
async fn writer_reenters_for_write_and_read() {
    let cluster = single_node(&["Printer_0"]).await;
    let mut u1 = cluster.client("u1").unwrap();
    let mut u2 = cluster.client("u2").unwrap();

    for mode in [
        AccessMode::WriteBlocking,
        AccessMode::WriteNonBlocking,
        AccessMode::ReadNonBlocking,
    ] {
        let reply = u1.access(&addr("m0"), "Printer_0", mode).await.unwrap();
        assert!(is_granted(&reply), "{mode:?} should be granted");
    }

    // Two write holds and one read hold must all be released
    request(&u2, "m0", "Printer_0", AccessMode::ReadBlocking).await;
    u1.release(&addr("m0"), "Printer_0", AccessKind::Write)
        .await
        .unwrap();
    u1.release(&addr("m0"), "Printer_0", AccessKind::Read)
        .await
        .unwrap();
    assert_waiting(&mut u2).await;

    u1.release(&addr("m0"), "Printer_0", AccessKind::Write)
        .await
        .unwrap();
    assert!(is_granted(&u2.recv().await.unwrap()));
}

#[tokio::test]
async fn unknown_resource_is_not_found() {
    let cluster = single_node(&["Printer_0"]).await;
    let mut u1 = cluster.client("u1").unwrap();

    let reply = u1
        .access(&addr("m0"), "Plotter_0", AccessMode::ReadBlocking)
        .await
        .unwrap();

    assert_eq!(access_denial(&reply), Some(AccessDenialReason::NotFound));
}
