//! The sender client.

use fe2o3_amqp::types::messaging::{Message, Properties};
use tracing::debug;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::handler::{EventContext, MessagingHandler};
use crate::results::ResultData;

/// Sends the configured payload until `count` deliveries have been accepted,
/// compensating each released or rejected delivery with one resend attempt.
#[derive(Debug)]
pub struct SenderClient {
    address: String,
    msgcount: u64,
    body: String,
    results: ResultData,
}

impl SenderClient {
    /// Creates a sender for the configured address, count and payload.
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            address: config.address.clone(),
            msgcount: config.count,
            body: config.body.clone(),
            results: ResultData::default(),
        }
    }

    /// Counters accumulated so far.
    pub fn results(&self) -> &ResultData {
        &self.results
    }

    /// Consumes the client, yielding its counters.
    pub fn into_results(self) -> ResultData {
        self.results
    }

    fn done_sending(&self) -> bool {
        self.results.accepted == self.msgcount
    }

    fn can_send(&self) -> bool {
        // Must be checked first to block a retry once sending is done
        if self.done_sending() {
            return false;
        }
        // Proceed only while accepted plus pending acks stays below the
        // target, otherwise outstanding deliveries could overshoot it
        self.results.accepted + self.results.pending_acks() < self.msgcount
    }

    fn send(&mut self, ctx: &mut EventContext, origin: &str) {
        if ctx.credit() == 0 || !self.can_send() {
            debug!(
                origin,
                credit = ctx.credit(),
                partial = %self.results,
                "unable to send"
            );
            return;
        }
        let id = Uuid::new_v4().to_string();
        let message = Message::builder()
            .properties(Properties::builder().message_id(id.clone()).build())
            .body(self.body.clone())
            .build();
        ctx.send(id, message);
        self.results.delivered += 1;
        debug!(
            origin,
            credit = ctx.credit(),
            partial = %self.results,
            "message sent"
        );
    }
}

impl MessagingHandler for SenderClient {
    fn on_start(&mut self, ctx: &mut EventContext) {
        ctx.open_sender(self.address.clone());
    }

    fn on_sendable(&mut self, ctx: &mut EventContext) {
        self.send(ctx, "on_sendable");
    }

    fn on_accepted(&mut self, ctx: &mut EventContext) {
        debug!(delivery_id = ctx.delivery_id(), "message accepted");
        self.results.accepted += 1;
        if self.done_sending() {
            debug!("done sending");
            ctx.close_link();
            ctx.close_connection();
        }
    }

    fn on_released(&mut self, ctx: &mut EventContext) {
        debug!(delivery_id = ctx.delivery_id(), "message released");
        self.results.released += 1;
        self.send(ctx, "on_released");
    }

    fn on_rejected(&mut self, ctx: &mut EventContext) {
        debug!(delivery_id = ctx.delivery_id(), "message rejected");
        self.results.rejected += 1;
        self.send(ctx, "on_rejected");
    }

    fn on_settled(&mut self, ctx: &mut EventContext) {
        debug!(delivery_id = ctx.delivery_id(), "message settled");
        self.results.settled += 1;
    }
}
