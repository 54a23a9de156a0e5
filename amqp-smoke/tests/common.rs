//! In-process AMQP listener shared by the integration tests
//!
//! Each test spawns a listener task that scripts the broker half of the
//! conversation, so the clients are exercised against a real protocol peer
//! without a broker container.

use fe2o3_amqp::acceptor::{
    link::{LinkAcceptor, LinkEndpoint},
    session::{ListenerSessionHandle, SessionAcceptor},
    ConnectionAcceptor, ListenerConnectionHandle,
};
use tokio::net::TcpListener;

/// Binds an ephemeral local port and returns the listener together with a
/// client URL targeting the given node address.
pub async fn bind_broker(address: &str) -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let url = format!("amqp://127.0.0.1:{}/{}", port, address);
    (listener, url)
}

/// Accepts one connection, one session and one link from the client under
/// test. The connection and session handles are returned so the caller keeps
/// them alive for the rest of the conversation.
pub async fn accept_link(
    listener: TcpListener,
) -> (ListenerConnectionHandle, ListenerSessionHandle, LinkEndpoint) {
    let (stream, _addr) = listener.accept().await.unwrap();
    let mut connection = ConnectionAcceptor::new("test-listener")
        .accept(stream)
        .await
        .unwrap();
    let mut session = SessionAcceptor::default()
        .accept(&mut connection)
        .await
        .unwrap();
    let link = LinkAcceptor::new().accept(&mut session).await.unwrap();
    (connection, session, link)
}
