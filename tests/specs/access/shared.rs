//! Shared read access specs

use crate::prelude::*;

#[tokio::test]
async fn readers_share_and_writer_waits_for_last_reader() {
    let cluster = single_node(&["Scanner_0"]).await;
    let mut readers = vec![
        cluster.client("u1").unwrap(),
        cluster.client("u2").unwrap(),
        cluster.client("u3").unwrap(),
    ];
    let mut writer = cluster.client("u4").unwrap();

    for reader in &readers {
        request(reader, "m0", "Scanner_0", AccessMode::ReadBlocking).await;
    }
    for reader in &mut readers {
        assert!(is_granted(&reader.recv().await.unwrap()));
    }

    request(&writer, "m0", "Scanner_0", AccessMode::WriteBlocking).await;
    assert_waiting(&mut writer).await;

    let (last, others) = readers.split_last().unwrap();
    for reader in others {
        reader
            .release(&addr("m0"), "Scanner_0", AccessKind::Read)
            .await
            .unwrap();
        assert_waiting(&mut writer).await;
    }

    last.release(&addr("m0"), "Scanner_0", AccessKind::Read)
        .await
        .unwrap();
    assert!(is_granted(&writer.recv().await.unwrap()));
}

#[tokio::test]
async fn sole_reader_upgrades_to_write() {
    let cluster = single_node(&["Scanner_0"]).await;
    let mut u1 = cluster.client("u1").unwrap();

    u1.access(&addr("m0"), "Scanner_0", AccessMode::ReadBlocking)
        .await
        .unwrap();
    let reply = u1
        .access(&addr("m0"), "Scanner_0", AccessMode::WriteNonBlocking)
        .await
        .unwrap();

    assert!(is_granted(&reply));
}

#[tokio::test]
async fn reader_cannot_upgrade_while_others_read() {
    let cluster = single_node(&["Scanner_0"]).await;
    let mut u1 = cluster.client("u1").unwrap();
    let mut u2 = cluster.client("u2").unwrap();

    u1.access(&addr("m0"), "Scanner_0", AccessMode::ReadBlocking)
        .await
        .unwrap();
    u2.access(&addr("m0"), "Scanner_0", AccessMode::ReadBlocking)
        .await
        .unwrap();

    let reply = u1
        .access(&addr("m0"), "Scanner_0", AccessMode::WriteNonBlocking)
        .await
        .unwrap();
    assert_eq!(access_denial(&reply), Some(AccessDenialReason::Busy));
}
