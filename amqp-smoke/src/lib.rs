#![deny(missing_docs, missing_debug_implementations)]

//! AMQP 1.0 smoke-test clients built on [`fe2o3-amqp`](https://docs.rs/fe2o3-amqp).
//!
//! Two small clients for exercising a broker or router: a sender that emits
//! identical messages until a target count of deliveries has been accepted,
//! and a receiver that accepts messages until the target count has arrived.
//! Both track delivery counters and report them as a JSON structure the test
//! driver parses.
//!
//! Protocol work (framing, connection negotiation, flow control) is
//! delegated entirely to `fe2o3-amqp`; this crate is the event dispatch and
//! counting logic around it. Clients implement [`MessagingHandler`] and are
//! driven by a [`Container`], which dispatches events one at a time and
//! applies the actions the handler queues.
//!
//! # Example
//!
//! ```rust,no_run
//! use amqp_smoke::{ClientConfig, Container, SenderClient};
//!
//! # async fn run() -> Result<(), amqp_smoke::ClientError> {
//! let config = ClientConfig::builder()
//!     .url("amqp://localhost:5672/queue-1")
//!     .count(100)
//!     .build()?;
//! let mut client = SenderClient::new(&config);
//! let container = Container::new(config);
//! container.run_sender(&mut client).await?;
//! println!("{}", client.results());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod container;
pub mod content;
pub mod error;
pub mod handler;
pub mod receiver;
pub mod results;
pub mod sender;

pub use config::ClientConfig;
pub use container::Container;
pub use error::ClientError;
pub use handler::{Action, EventContext, MessagingHandler};
pub use receiver::ReceiverClient;
pub use results::ResultData;
pub use sender::SenderClient;
