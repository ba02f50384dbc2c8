mod common;

use std::error::Error;

use api::{QueueError, QueueEvent};
use common::PASSWORD;

#[tokio::test]
async fn init_starts_with_persisted_line() -> Result<(), Box<dyn Error>> {
    let (_guard, service) = common::setup_service().await?;

    let first = service.join("Alice", None).await?;
    service.shutdown().await;

    let restarted = api::init(api::ServiceConfig::new(
        api::DbConfig::memory(),
        api::GateConfig::new(PASSWORD, "service-secret"),
    ))
    .await?;
    assert_eq!(restarted.list().await?, vec![first]);

    restarted.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn second_init_is_refused_while_running() -> Result<(), Box<dyn Error>> {
    let (_guard, service) = common::setup_service().await?;

    let err = api::init(api::ServiceConfig::new(
        api::DbConfig::memory(),
        api::GateConfig::new(PASSWORD, "service-secret"),
    ))
    .await
    .err()
    .expect("second init must fail");
    assert!(matches!(err, QueueError::StoreUnavailable(_)));

    service.join("Still", None).await?;
    assert_eq!(service.list().await?.len(), 1);

    service.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn public_operations_need_no_credential() -> Result<(), Box<dyn Error>> {
    let (_guard, service) = common::setup_service().await?;

    let alice = service.join("  Alice ", Some("s-1".into())).await?;
    let bob = service.join("Bob", Some("   ".into())).await?;
    assert_eq!(alice.name, "Alice");
    assert_eq!(alice.student_id.as_deref(), Some("s-1"));
    assert_eq!(bob.student_id, None);
    assert_eq!(bob.position, 2);

    assert_eq!(service.list().await?, vec![alice, bob]);
    service.health().await?;

    service.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn empty_name_is_rejected() -> Result<(), Box<dyn Error>> {
    let (_guard, service) = common::setup_service().await?;

    let err = service.join("", None).await.unwrap_err();
    assert!(matches!(err, QueueError::Validation(_)));
    assert!(service.list().await?.is_empty());

    service.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn administrative_operations_go_through_gate() -> Result<(), Box<dyn Error>> {
    let (_guard, service) = common::setup_service().await?;

    let alice = service.join("Alice", None).await?;
    let bob = service.join("Bob", None).await?;
    let id = alice.id.to_string();

    assert_eq!(
        service.remove_by_id(&id, "wrong").await.unwrap_err(),
        QueueError::Unauthorized
    );
    assert_eq!(service.list().await?.len(), 2);

    let session = service.issue_session(PASSWORD)?;
    assert_eq!(service.remove_by_id(&id, &session.token).await?, alice.id);

    let list = service.list().await?;
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, bob.id);
    assert_eq!(list[0].position, 1);

    assert_eq!(
        service.clear("wrong").await.unwrap_err(),
        QueueError::Unauthorized
    );
    assert_eq!(service.clear(PASSWORD).await?, 1);
    assert!(service.list().await?.is_empty());

    service.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn wrong_password_gets_no_session() -> Result<(), Box<dyn Error>> {
    let (_guard, service) = common::setup_service().await?;

    assert_eq!(
        service.issue_session("wrong").unwrap_err(),
        QueueError::Unauthorized
    );

    service.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn subscribers_see_committed_changes() -> Result<(), Box<dyn Error>> {
    let (_guard, service) = common::setup_service().await?;
    let mut events = service.subscribe();

    let entry = service.join("Watcher", None).await?;
    service.remove_by_id(&entry.id.to_string(), PASSWORD).await?;

    match events.recv().await? {
        QueueEvent::Joined { entry: joined, .. } => assert_eq!(joined, entry),
        other => panic!("unexpected event: {other:?}"),
    }
    match events.recv().await? {
        QueueEvent::Removed {
            entry_id, position, ..
        } => {
            assert_eq!(entry_id, entry.id);
            assert_eq!(position, 1);
        }
        other => panic!("unexpected event: {other:?}"),
    }

    service.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn shut_down_service_reports_store_unavailable() -> Result<(), Box<dyn Error>> {
    let (_guard, service) = common::setup_service().await?;
    service.shutdown().await;

    assert!(matches!(
        service.list().await.unwrap_err(),
        QueueError::StoreUnavailable(_)
    ));
    assert!(service.health().await.is_err());
    Ok(())
}
