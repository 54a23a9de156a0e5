//! Tests the receiver client against an in-process listener

use amqp_smoke::{ClientConfig, Container, ReceiverClient, ResultData};
use fe2o3_amqp::acceptor::link::LinkEndpoint;
use fe2o3_amqp::types::messaging::Message;

mod common;

#[tokio::test]
async fn accepts_every_delivery_up_to_the_target_count() {
    let (listener, url) = common::bind_broker("smoke-queue").await;

    let broker = tokio::spawn(async move {
        let (mut connection, mut session, link) = common::accept_link(listener).await;
        let mut sender = match link {
            LinkEndpoint::Sender(sender) => sender,
            LinkEndpoint::Receiver(_) => panic!("expected the client to attach a receiver"),
        };

        for i in 0..3 {
            let message = Message::builder().value(format!("greeting-{}", i)).build();
            let outcome = sender.send(message).await.unwrap();
            outcome.accepted_or_else(|outcome| outcome).unwrap();
        }

        // The detach may cross the one sent by the client
        let _ = sender.close().await;
        session.on_end().await.unwrap();
        connection.on_close().await.unwrap();
    });

    let config = ClientConfig::builder()
        .url(url)
        .count(3)
        .build()
        .unwrap();
    let mut client = ReceiverClient::new(&config);
    let container = Container::new(config);

    container.run_receiver(&mut client).await.unwrap();
    broker.await.unwrap();

    let expected = ResultData {
        delivered: 3,
        accepted: 0,
        released: 0,
        rejected: 0,
        settled: 0,
        errormsg: String::new(),
    };
    assert_eq!(client.into_results(), expected);
}
