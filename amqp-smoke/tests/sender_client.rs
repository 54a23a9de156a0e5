//! Tests the sender client against an in-process listener

use std::time::Duration;

use amqp_smoke::{ClientConfig, ClientError, Container, ResultData, SenderClient};
use fe2o3_amqp::acceptor::link::LinkEndpoint;
use fe2o3_amqp::types::primitives::Value;

mod common;

#[tokio::test]
async fn delivers_until_the_target_count_is_accepted() {
    let (listener, url) = common::bind_broker("smoke-queue").await;

    let broker = tokio::spawn(async move {
        let (mut connection, mut session, link) = common::accept_link(listener).await;
        let mut receiver = match link {
            LinkEndpoint::Receiver(receiver) => receiver,
            LinkEndpoint::Sender(_) => panic!("expected the client to attach a sender"),
        };

        for _ in 0..3 {
            let delivery = receiver.recv::<Value>().await.unwrap();
            receiver.accept(&delivery).await.unwrap();
        }

        // The client detaches once the last delivery is accepted
        while receiver.recv::<Value>().await.is_ok() {}
        receiver.close().await.unwrap();
        session.on_end().await.unwrap();
        connection.on_close().await.unwrap();
    });

    let config = ClientConfig::builder()
        .url(url)
        .count(3)
        .body("test-message")
        .build()
        .unwrap();
    let mut client = SenderClient::new(&config);
    let container = Container::new(config);

    container.run_sender(&mut client).await.unwrap();
    broker.await.unwrap();

    let expected = ResultData {
        delivered: 3,
        accepted: 3,
        released: 0,
        rejected: 0,
        settled: 3,
        errormsg: String::new(),
    };
    assert_eq!(client.into_results(), expected);
}

#[tokio::test]
async fn rejected_deliveries_stall_the_run_until_the_deadline() {
    let (listener, url) = common::bind_broker("smoke-queue").await;

    let broker = tokio::spawn(async move {
        let (_connection, _session, link) = common::accept_link(listener).await;
        let mut receiver = match link {
            LinkEndpoint::Receiver(receiver) => receiver,
            LinkEndpoint::Sender(_) => panic!("expected the client to attach a sender"),
        };

        let first = receiver.recv::<Value>().await.unwrap();
        receiver.reject(&first, None).await.unwrap();
        let second = receiver.recv::<Value>().await.unwrap();
        receiver.accept(&second).await.unwrap();

        // The rejected delivery never frees its slot, so the client hangs
        // until its deadline and the connection simply drops.
        while receiver.recv::<Value>().await.is_ok() {}
    });

    let config = ClientConfig::builder()
        .url(url)
        .count(2)
        .body("test-message")
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap();
    let mut client = SenderClient::new(&config);
    let container = Container::new(config);

    let error = container.run_sender(&mut client).await.unwrap_err();
    assert!(matches!(error, ClientError::Timeout));
    assert_eq!(error.to_string(), "Timed out");

    let results = client.into_results();
    assert_eq!(results.delivered, 2);
    assert_eq!(results.accepted, 1);
    assert_eq!(results.rejected, 1);
    assert_eq!(results.released, 0);
    assert_eq!(results.settled, 2);

    broker.await.unwrap();
}
