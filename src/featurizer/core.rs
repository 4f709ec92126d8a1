//! Resolves the capture vantage point and folds every session into one
//! fixed-length feature vector for the downstream classifier.
use super::containers::{FeatureSet, MacCounts, SessionMap};
use super::fields::{self, PROTOCOL_ICMP, PROTOCOL_TCP, PROTOCOL_UDP};
use std::collections::{BTreeSet, HashMap};

/// Widest port with a dedicated histogram bin unless overridden.
pub const DEFAULT_MAX_PORT: usize = 1024;

/// Sentinel returned when no capture source can be resolved.
pub const CAPTURE_SOURCE_NONE: &str = "00:00:00:00:00:00";

/// Resolves the capture source of a session map.
///
/// The vantage point is assumed to be the internal host seen most often: an
/// external capture point would witness few private-to-private flows. Every
/// session whose endpoints are both private contributes its first packet's
/// MAC pair to per-MAC tallies; the MAC with the highest overall tally wins.
/// Ties rank by (count descending, MAC ascending) so the result is stable
/// across runs. With no qualifying sessions the sentinel
/// [CAPTURE_SOURCE_NONE] is returned.
pub fn get_source(sessions: &SessionMap) -> String {
    log::info!("Resolving capture source over {} sessions.", sessions.len());
    let mut macs: HashMap<String, MacCounts> = HashMap::new();

    for (key, session) in sessions {
        let Some(first_packet) = session.first() else {
            log::warn!("Session {key} has no packets, skipping.");
            continue;
        };

        let outgoing_private = fields::is_private(key.outgoing_address()).unwrap_or(false);
        let incoming_private = fields::is_private(key.incoming_address()).unwrap_or(false);

        // Only internal <-> internal sessions vote
        if !(outgoing_private && incoming_private) {
            continue;
        }

        let (source_mac, destination_mac) = fields::extract_macs(first_packet.data());

        macs.entry(source_mac.clone()).or_default().all += 1;
        macs.entry(destination_mac.clone()).or_default().all += 1;
        macs.entry(source_mac).or_default().outgoing += 1;
        macs.entry(destination_mac).or_default().incoming += 1;
    }

    let mut ranked: Vec<(&String, &MacCounts)> = macs.iter().collect();
    ranked.sort_by(|a, b| b.1.all.cmp(&a.1.all).then(a.0.cmp(b.0)));

    match ranked.first() {
        Some((mac, counts)) => {
            log::debug!(
                "Capture source {mac}: {} sessions ({} incoming, {} outgoing).",
                counts.all,
                counts.incoming,
                counts.outgoing
            );
            (*mac).clone()
        }
        None => {
            log::warn!("No private-to-private sessions found, using sentinel source.");
            CAPTURE_SOURCE_NONE.to_owned()
        }
    }
}

/// Extracts netflow-level features from a session map.
///
/// When `capture_source` is not supplied it is resolved via [get_source].
/// One pass over all sessions: each session originated by the capture source
/// bumps the total count, the external/tcp/udp/icmp counters and the per-port
/// histograms (ports at or above `max_port` keep counting toward totals but
/// get no bin). Private addresses on the far side of the capture source are
/// collected as its peers. All counters are then normalized by the number of
/// originated sessions; an empty pass yields an all-zero vector rather than
/// dividing by zero.
pub fn extract_features(
    sessions: &SessionMap,
    capture_source: Option<&str>,
    max_port: usize,
) -> FeatureSet {
    let capture_source = match capture_source {
        Some(mac) => mac.to_owned(),
        None => get_source(sessions),
    };
    log::info!("Extracting features relative to {capture_source}.");

    let mut source_bins = vec![0u64; max_port];
    let mut destination_bins = vec![0u64; max_port];
    let mut num_sessions = 0u64;
    let mut num_external = 0u64;
    let mut num_tcp = 0u64;
    let mut num_udp = 0u64;
    let mut num_icmp = 0u64;
    let mut other_addresses: BTreeSet<String> = BTreeSet::new();

    for (key, session) in sessions {
        let Some(first_packet) = session.first() else {
            log::warn!("Session {key} has no packets, skipping.");
            continue;
        };

        let (source_mac, destination_mac) = fields::extract_macs(first_packet.data());
        let outgoing_address = key.outgoing_address();
        let incoming_address = key.incoming_address();

        if source_mac == capture_source {
            if fields::is_private(incoming_address).unwrap_or(false) {
                other_addresses.insert(incoming_address.to_owned());
            }

            num_sessions += 1;
            num_external += u64::from(fields::is_external(outgoing_address, incoming_address));
            num_tcp += u64::from(fields::is_protocol(session, PROTOCOL_TCP));
            num_udp += u64::from(fields::is_protocol(session, PROTOCOL_UDP));
            num_icmp += u64::from(fields::is_protocol(session, PROTOCOL_ICMP));

            if let Some(port) = key.outgoing_port().filter(|port| *port < max_port) {
                source_bins[port] += 1;
            }
            if let Some(port) = key.incoming_port().filter(|port| *port < max_port) {
                destination_bins[port] += 1;
            }
        }

        if destination_mac == capture_source
            && fields::is_private(outgoing_address).unwrap_or(false)
        {
            other_addresses.insert(outgoing_address.to_owned());
        }
    }

    // Normalizing by 1 keeps an empty pass at all-zero instead of NaN
    let divisor = num_sessions.max(1) as f64;

    let mut vector: Vec<f64> = Vec::with_capacity(2 * max_port + 4);
    vector.extend(source_bins.iter().map(|count| *count as f64 / divisor));
    vector.extend(destination_bins.iter().map(|count| *count as f64 / divisor));
    vector.push(num_external as f64 / divisor);
    vector.push(num_tcp as f64 / divisor);
    vector.push(num_udp as f64 / divisor);
    vector.push(num_icmp as f64 / divisor);

    let total_bytes: u64 = sessions.values().map(fields::extract_session_size).sum();
    log::info!(
        "Featurized {num_sessions} sessions ({total_bytes} bytes on the wire) from {capture_source}, {} peers.",
        other_addresses.len()
    );

    FeatureSet {
        capture_source,
        max_port,
        vector,
        other_addresses: other_addresses.into_iter().collect(),
    }
}
