use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single captured frame as handed over by the sessionizer.
///
/// `data` is the hex-digit rendering of the raw frame bytes, untagged
/// Ethernet + IPv4 layout assumed. JSON form is a `[timestamp, "hex"]` pair.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PacketRecord(pub f64, pub String);

impl PacketRecord {
    pub fn timestamp(&self) -> f64 {
        self.0
    }

    pub fn data(&self) -> &str {
        &self.1
    }
}

/// Ordered pair of `address:port` endpoints identifying one session.
///
/// The pair order is fixed by the sessionizer and never sorted here:
/// `outgoing` is the side that opened the session (source side), `incoming`
/// the responder (destination side).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionKey {
    pub outgoing: String,
    pub incoming: String,
}

impl SessionKey {
    pub fn new(outgoing: &str, incoming: &str) -> Self {
        Self {
            outgoing: outgoing.to_owned(),
            incoming: incoming.to_owned(),
        }
    }

    pub fn outgoing_address(&self) -> &str {
        split_endpoint(&self.outgoing).0
    }

    pub fn outgoing_port(&self) -> Option<usize> {
        split_endpoint(&self.outgoing).1
    }

    pub fn incoming_address(&self) -> &str {
        split_endpoint(&self.incoming).0
    }

    pub fn incoming_port(&self) -> Option<usize> {
        split_endpoint(&self.incoming).1
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} -> {}", self.outgoing, self.incoming)
    }
}

/// Splits an `address:port` endpoint. A missing or unparsable port becomes
/// None so malformed keys degrade instead of failing the whole pass.
fn split_endpoint(endpoint: &str) -> (&str, Option<usize>) {
    match endpoint.split_once(':') {
        Some((address, port)) => (address, port.parse::<usize>().ok()),
        None => (endpoint, None),
    }
}

/// All packets of one session, in capture order.
pub type Session = Vec<PacketRecord>;

/// Session map as consumed by the aggregator. BTreeMap keeps iteration
/// deterministic, so repeated runs over the same dump rank identically.
pub type SessionMap = BTreeMap<SessionKey, Session>;

/// One session as it appears in the sessionizer's JSON dump.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionDump {
    pub endpoints: (String, String),
    pub packets: Vec<PacketRecord>,
}

/// Per-MAC session tallies gathered while resolving the capture source.
/// Incoming counts appearances as frame destination, outgoing as source.
#[derive(Clone, Debug, Default)]
pub struct MacCounts {
    pub all: u64,
    pub incoming: u64,
    pub outgoing: u64,
}

/// The featurized representation of a capture, plus the context needed to
/// interpret it: which MAC was taken as the vantage point and which private
/// peers it talked to.
#[derive(Clone, Debug, Serialize)]
pub struct FeatureSet {
    pub capture_source: String,
    pub max_port: usize,
    pub vector: Vec<f64>,
    pub other_addresses: Vec<String>,
}

impl FeatureSet {
    /// Source-side port histogram, `max_port` entries.
    pub fn source_ports(&self) -> &[f64] {
        &self.vector[..self.max_port]
    }

    /// Destination-side port histogram, `max_port` entries.
    pub fn destination_ports(&self) -> &[f64] {
        &self.vector[self.max_port..2 * self.max_port]
    }

    /// Trailing [external, tcp, udp, icmp] session fractions.
    pub fn ratios(&self) -> &[f64] {
        &self.vector[2 * self.max_port..]
    }
}
