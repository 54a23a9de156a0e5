//! The client runtime.
//!
//! Owns the engine handles for one connection, one session and one link, and
//! dispatches messaging events to a [`MessagingHandler`], one at a time, on
//! the driving task. Actions the handler queues during a dispatch are applied
//! in order when the dispatch returns.

use fe2o3_amqp::link::SendError;
use fe2o3_amqp::types::messaging::{AmqpValue, Body, Outcome};
use fe2o3_amqp::types::primitives::Value;
use fe2o3_amqp::{Connection, Receiver, Sender, Session};
use futures_util::future::BoxFuture;
use futures_util::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::handler::{Action, EventContext, MessagingHandler};

/// Outcome futures retained for deliveries handed to the engine, labelled
/// with the message id the handler chose.
type InFlight = FuturesUnordered<BoxFuture<'static, (String, Result<Outcome, SendError>)>>;

#[derive(Debug)]
enum Running {
    Continue,
    Stop,
}

/// Drives one client over one connection.
///
/// The sender side synthesizes credit events: the link may keep up to
/// `window` deliveries in flight, and one sendable event is dispatched per
/// free slot for as long as the handler keeps sending. Delivery outcomes are
/// reported back through the outcome events; the engine resolves them at
/// settlement, so the settled event follows the outcome of the same delivery.
/// The whole run is bounded by the configured timeout.
#[derive(Debug)]
pub struct Container {
    config: ClientConfig,
}

impl Container {
    /// Creates a runtime for the given config.
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// The config this runtime was created with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Runs a sending handler to completion.
    pub async fn run_sender<H>(&self, handler: &mut H) -> Result<(), ClientError>
    where
        H: MessagingHandler,
    {
        match tokio::time::timeout(self.config.timeout, self.drive_sender(handler)).await {
            Ok(result) => result,
            Err(_elapsed) => Err(ClientError::Timeout),
        }
    }

    /// Runs a receiving handler to completion.
    pub async fn run_receiver<H>(&self, handler: &mut H) -> Result<(), ClientError>
    where
        H: MessagingHandler,
    {
        match tokio::time::timeout(self.config.timeout, self.drive_receiver(handler)).await {
            Ok(result) => result,
            Err(_elapsed) => Err(ClientError::Timeout),
        }
    }

    #[instrument(name = "Container::drive_sender", skip_all, fields(container_id = %self.config.container_id))]
    async fn drive_sender<H>(&self, handler: &mut H) -> Result<(), ClientError>
    where
        H: MessagingHandler,
    {
        let mut connection = Connection::builder()
            .container_id(self.config.container_id.clone())
            .open(self.config.url.as_str())
            .await?;
        let mut session = Session::begin(&mut connection).await?;

        let mut ctx = EventContext::new(0, None);
        handler.on_start(&mut ctx);
        let address = requested_sender_address(ctx.take_actions())?;
        let link_name = format!("{}-sender", self.config.container_id);
        let mut sender = Sender::attach(&mut session, link_name, &address).await?;
        debug!(%address, "sender link attached");

        let window = self.config.window as usize;
        let mut in_flight = InFlight::new();

        'drive: loop {
            // Offer one sendable event per free window slot until the
            // handler declines
            while in_flight.len() < window {
                let credit = (window - in_flight.len()) as u32;
                let mut ctx = EventContext::new(credit, None);
                handler.on_sendable(&mut ctx);
                let before = in_flight.len();
                match self
                    .apply_sender_actions(ctx.take_actions(), &mut sender, &mut in_flight)
                    .await?
                {
                    Running::Continue => {}
                    Running::Stop => break 'drive,
                }
                if in_flight.len() == before {
                    break;
                }
            }

            match in_flight.next().await {
                Some((id, result)) => {
                    let outcome = result?;
                    let credit = window.saturating_sub(in_flight.len()) as u32;
                    let mut ctx = EventContext::new(credit, Some(id));
                    match outcome {
                        Outcome::Accepted(_) => handler.on_accepted(&mut ctx),
                        Outcome::Released(_) => handler.on_released(&mut ctx),
                        Outcome::Rejected(_) => handler.on_rejected(&mut ctx),
                        // Modified deliveries surface to the released handler
                        Outcome::Modified(_) => handler.on_released(&mut ctx),
                    }
                    // Outcomes are reported at settlement, so the settled
                    // event follows right away
                    handler.on_settled(&mut ctx);
                    match self
                        .apply_sender_actions(ctx.take_actions(), &mut sender, &mut in_flight)
                        .await?
                    {
                        Running::Continue => {}
                        Running::Stop => break 'drive,
                    }
                }
                None => {
                    // Nothing in flight and the handler declined to send.
                    // Hold here until the run deadline fires.
                    debug!("sender stalled, waiting for the deadline");
                    std::future::pending::<()>().await;
                }
            }
        }

        debug!("closing");
        sender.close().await?;
        session.end().await?;
        connection.close().await?;
        Ok(())
    }

    /// Applies the actions queued during one sender-side dispatch. A close
    /// request stops the drive loop; the orderly link, session and
    /// connection teardown happens in one place after it.
    async fn apply_sender_actions(
        &self,
        actions: Vec<Action>,
        sender: &mut Sender,
        in_flight: &mut InFlight,
    ) -> Result<Running, ClientError> {
        for action in actions {
            match action {
                Action::Send { id, message } => {
                    let fut = sender.send_batchable(message.map_body(AmqpValue)).await?;
                    in_flight.push(Box::pin(async move { (id, fut.await) }));
                }
                Action::CloseLink | Action::CloseConnection => return Ok(Running::Stop),
                other => debug!(?other, "action ignored on a sender run"),
            }
        }
        Ok(Running::Continue)
    }

    #[instrument(name = "Container::drive_receiver", skip_all, fields(container_id = %self.config.container_id))]
    async fn drive_receiver<H>(&self, handler: &mut H) -> Result<(), ClientError>
    where
        H: MessagingHandler,
    {
        let mut connection = Connection::builder()
            .container_id(self.config.container_id.clone())
            .open(self.config.url.as_str())
            .await?;
        let mut session = Session::begin(&mut connection).await?;

        let mut ctx = EventContext::new(0, None);
        handler.on_start(&mut ctx);
        let address = requested_receiver_address(ctx.take_actions())?;
        let link_name = format!("{}-receiver", self.config.container_id);
        let mut receiver = Receiver::attach(&mut session, link_name, &address).await?;
        debug!(%address, "receiver link attached");

        'drive: loop {
            let delivery = receiver.recv::<Body<Value>>().await?;
            let mut ctx = EventContext::new(0, None);
            handler.on_message(&mut ctx, delivery.body());
            for action in ctx.take_actions() {
                match action {
                    Action::Accept => receiver.accept(&delivery).await?,
                    Action::CloseLink | Action::CloseConnection => break 'drive,
                    other => debug!(?other, "action ignored on a receiver run"),
                }
            }
        }

        debug!("closing");
        receiver.close().await?;
        session.end().await?;
        connection.close().await?;
        Ok(())
    }
}

fn requested_sender_address(actions: Vec<Action>) -> Result<String, ClientError> {
    for action in actions {
        if let Action::OpenSender { address } = action {
            return Ok(address);
        }
    }
    Err(ClientError::LinkNotRequested)
}

fn requested_receiver_address(actions: Vec<Action>) -> Result<String, ClientError> {
    for action in actions {
        if let Action::OpenReceiver { address } = action {
            return Ok(address);
        }
    }
    Err(ClientError::LinkNotRequested)
}
