//! The receiver client.

use fe2o3_amqp::types::messaging::Body;
use fe2o3_amqp::types::primitives::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::handler::{EventContext, MessagingHandler};
use crate::results::ResultData;

/// Receives and accepts messages until the target count has arrived, then
/// closes the link and the connection.
#[derive(Debug)]
pub struct ReceiverClient {
    address: String,
    msgcount: u64,
    results: ResultData,
}

impl ReceiverClient {
    /// Creates a receiver for the configured address and count.
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            address: config.address.clone(),
            msgcount: config.count,
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

    fn done_receiving(&self) -> bool {
        self.results.delivered == self.msgcount
    }
}

impl MessagingHandler for ReceiverClient {
    fn on_start(&mut self, ctx: &mut EventContext) {
        ctx.open_receiver(self.address.clone());
    }

    fn on_message(&mut self, ctx: &mut EventContext, _body: &Body<Value>) {
        self.results.delivered += 1;
        debug!(
            delivered = self.results.delivered,
            msgcount = self.msgcount,
            "message received"
        );
        ctx.accept();
        if self.done_receiving() {
            debug!("done receiving");
            ctx.close_link();
            ctx.close_connection();
        }
    }
}
