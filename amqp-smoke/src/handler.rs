//! Notification dispatch between the client runtime and handler objects.

use fe2o3_amqp::types::messaging::{Body, Message};
use fe2o3_amqp::types::primitives::Value;

/// Side effect a handler can request from the runtime.
///
/// Handlers never touch the protocol engine directly. They queue actions on
/// the event context and the runtime applies them, in order, after the
/// dispatch returns.
#[derive(Debug)]
pub enum Action {
    /// Attach a sender link to the given target address.
    OpenSender {
        /// Target address of the link.
        address: String,
    },
    /// Attach a receiver link to the given source address.
    OpenReceiver {
        /// Source address of the link.
        address: String,
    },
    /// Hand a message to the sender link. The id labels the delivery in
    /// later notifications.
    Send {
        /// Label for the delivery in later notifications.
        id: String,
        /// The message to send.
        message: Message<String>,
    },
    /// Accept the delivery the current event refers to.
    Accept,
    /// Detach the link.
    CloseLink,
    /// End the session and close the connection.
    CloseConnection,
}

/// State snapshot an event is dispatched with, plus the queue of actions the
/// handler requests.
#[derive(Debug)]
pub struct EventContext {
    credit: u32,
    delivery_id: Option<String>,
    actions: Vec<Action>,
}

impl EventContext {
    pub(crate) fn new(credit: u32, delivery_id: Option<String>) -> Self {
        Self {
            credit,
            delivery_id,
            actions: Vec::new(),
        }
    }

    /// Credit available on the sender link when the event fired.
    pub fn credit(&self) -> u32 {
        self.credit
    }

    /// Id of the delivery this event refers to, when there is one.
    pub fn delivery_id(&self) -> Option<&str> {
        self.delivery_id.as_deref()
    }

    /// Requests a sender link to `address`.
    pub fn open_sender(&mut self, address: impl Into<String>) {
        self.actions.push(Action::OpenSender {
            address: address.into(),
        });
    }

    /// Requests a receiver link from `address`.
    pub fn open_receiver(&mut self, address: impl Into<String>) {
        self.actions.push(Action::OpenReceiver {
            address: address.into(),
        });
    }

    /// Hands `message` to the sender link, labelled `id` in later events.
    pub fn send(&mut self, id: impl Into<String>, message: Message<String>) {
        self.actions.push(Action::Send {
            id: id.into(),
            message,
        });
    }

    /// Accepts the delivery the current event refers to.
    pub fn accept(&mut self) {
        self.actions.push(Action::Accept);
    }

    /// Requests a link detach.
    pub fn close_link(&mut self) {
        self.actions.push(Action::CloseLink);
    }

    /// Requests the session end and connection close.
    pub fn close_connection(&mut self) {
        self.actions.push(Action::CloseConnection);
    }

    pub(crate) fn take_actions(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.actions)
    }
}

/// Callbacks a client implements to react to messaging events.
///
/// Every method defaults to doing nothing. Dispatch is strictly serialized on
/// one task, so implementations keep plain mutable state and never block.
pub trait MessagingHandler {
    /// The connection and session are up.
    fn on_start(&mut self, _ctx: &mut EventContext) {}

    /// The sender link has credit to transmit.
    fn on_sendable(&mut self, _ctx: &mut EventContext) {}

    /// A delivery arrived on the receiver link.
    fn on_message(&mut self, _ctx: &mut EventContext, _body: &Body<Value>) {}

    /// The peer accepted a delivery.
    fn on_accepted(&mut self, _ctx: &mut EventContext) {}

    /// The peer released a delivery.
    fn on_released(&mut self, _ctx: &mut EventContext) {}

    /// The peer rejected a delivery.
    fn on_rejected(&mut self, _ctx: &mut EventContext) {}

    /// A delivery settled.
    fn on_settled(&mut self, _ctx: &mut EventContext) {}
}
