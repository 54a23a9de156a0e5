//! Delivery counters reported by the smoke-test clients.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Counters accumulated over one client run.
///
/// The binaries print the JSON form on stdout and the test driver parses it,
/// so the field names are part of the output contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultData {
    /// Messages handed to the link, including compensating resends.
    pub delivered: u64,
    /// Deliveries the peer reported as accepted.
    pub accepted: u64,
    /// Deliveries the peer reported as released.
    pub released: u64,
    /// Deliveries the peer reported as rejected.
    pub rejected: u64,
    /// Deliveries that reached settlement.
    pub settled: u64,
    /// Empty on success, otherwise the error that ended the run.
    #[serde(default)]
    pub errormsg: String,
}

impl ResultData {
    /// Deliveries still waiting for an outcome. Rejected deliveries are never
    /// subtracted, so each of them permanently occupies one slot.
    pub fn pending_acks(&self) -> u64 {
        debug_assert!(self.released + self.accepted <= self.delivered);
        self.delivered - self.released - self.accepted
    }
}

impl fmt::Display for ResultData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => f.write_str("{}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_all_zero() {
        let results = ResultData::default();
        assert_eq!(results.delivered, 0);
        assert_eq!(results.accepted, 0);
        assert_eq!(results.released, 0);
        assert_eq!(results.rejected, 0);
        assert_eq!(results.settled, 0);
        assert!(results.errormsg.is_empty());
    }

    #[test]
    fn json_field_names_are_stable() {
        let results = ResultData {
            delivered: 3,
            accepted: 2,
            released: 1,
            rejected: 0,
            settled: 3,
            errormsg: String::new(),
        };
        let json = serde_json::to_string(&results).unwrap();
        assert_eq!(
            json,
            r#"{"delivered":3,"accepted":2,"released":1,"rejected":0,"settled":3,"errormsg":""}"#
        );
    }

    #[test]
    fn display_is_the_json_form() {
        let mut results = ResultData::default();
        results.delivered = 1;
        results.errormsg = "Timed out".to_string();
        assert_eq!(results.to_string(), serde_json::to_string(&results).unwrap());
    }

    #[test]
    fn errormsg_defaults_to_empty_on_deserialize() {
        let json = r#"{"delivered":5,"accepted":5,"released":0,"rejected":0,"settled":5}"#;
        let results: ResultData = serde_json::from_str(json).unwrap();
        assert_eq!(results.accepted, 5);
        assert!(results.errormsg.is_empty());
    }

    #[test]
    fn pending_acks_ignores_rejected() {
        let results = ResultData {
            delivered: 4,
            accepted: 1,
            released: 1,
            rejected: 2,
            settled: 4,
            errormsg: String::new(),
        };
        assert_eq!(results.pending_acks(), 2);
    }
}
