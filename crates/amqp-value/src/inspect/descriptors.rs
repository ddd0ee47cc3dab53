//! Well-known AMQP 1.0 descriptor codes.
//!
//! Used by the inspector to name described values and the fields of their
//! list bodies.

use lazy_static::lazy_static;
use rustc_hash::FxHashMap;

/// A named composite type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    pub name: &'static str,
    /// Names of the list fields, in order.
    pub fields: &'static [&'static str],
}

const DESCRIPTORS: &[(u64, &str, &[&str])] = &[
    // transport performatives
    (
        0x10,
        "open",
        &[
            "container-id",
            "hostname",
            "max-frame-size",
            "channel-max",
            "idle-time-out",
            "outgoing-locales",
            "incoming-locales",
            "offered-capabilities",
            "desired-capabilities",
            "properties",
        ],
    ),
    (
        0x11,
        "begin",
        &[
            "remote-channel",
            "next-outgoing-id",
            "incoming-window",
            "outgoing-window",
            "handle-max",
            "offered-capabilities",
            "desired-capabilities",
            "properties",
        ],
    ),
    (
        0x12,
        "attach",
        &[
            "name",
            "handle",
            "role",
            "snd-settle-mode",
            "rcv-settle-mode",
            "source",
            "target",
            "unsettled",
            "incomplete-unsettled",
            "initial-delivery-count",
            "max-message-size",
            "offered-capabilities",
            "desired-capabilities",
            "properties",
        ],
    ),
    (
        0x13,
        "flow",
        &[
            "next-incoming-id",
            "incoming-window",
            "next-outgoing-id",
            "outgoing-window",
            "handle",
            "delivery-count",
            "link-credit",
            "available",
            "drain",
            "echo",
            "properties",
        ],
    ),
    (
        0x14,
        "transfer",
        &[
            "handle",
            "delivery-id",
            "delivery-tag",
            "message-format",
            "settled",
            "more",
            "rcv-settle-mode",
            "state",
            "resume",
            "aborted",
            "batchable",
        ],
    ),
    (
        0x15,
        "disposition",
        &["role", "first", "last", "settled", "state", "batchable"],
    ),
    (0x16, "detach", &["handle", "closed", "error"]),
    (0x17, "end", &["error"]),
    (0x18, "close", &["error"]),
    (0x1d, "error", &["condition", "description", "info"]),
    // delivery states
    (0x23, "received", &["section-number", "section-offset"]),
    (0x24, "accepted", &[]),
    (0x25, "rejected", &["error"]),
    (0x26, "released", &[]),
    (
        0x27,
        "modified",
        &["delivery-failed", "undeliverable-here", "message-annotations"],
    ),
    // terminus
    (
        0x28,
        "source",
        &[
            "address",
            "durable",
            "expiry-policy",
            "timeout",
            "dynamic",
            "dynamic-node-properties",
            "distribution-mode",
            "filter",
            "default-outcome",
            "outcomes",
            "capabilities",
        ],
    ),
    (
        0x29,
        "target",
        &[
            "address",
            "durable",
            "expiry-policy",
            "timeout",
            "dynamic",
            "dynamic-node-properties",
            "capabilities",
        ],
    ),
    (0x2b, "delete-on-close", &[]),
    (0x2c, "delete-on-no-links", &[]),
    (0x2d, "delete-on-no-messages", &[]),
    (0x2e, "delete-on-no-links-or-messages", &[]),
    // transactions
    (0x30, "coordinator", &["capabilities"]),
    (0x31, "declare", &["global-id"]),
    (0x32, "discharge", &["txn-id", "fail"]),
    (0x33, "declared", &["txn-id"]),
    (0x34, "transactional-state", &["txn-id", "outcome"]),
    // security
    (0x40, "sasl-mechanisms", &["sasl-server-mechanisms"]),
    (0x41, "sasl-init", &["mechanism", "initial-response", "hostname"]),
    (0x42, "sasl-challenge", &["challenge"]),
    (0x43, "sasl-response", &["response"]),
    (0x44, "sasl-outcome", &["code", "additional-data"]),
    // message sections
    (
        0x70,
        "header",
        &["durable", "priority", "ttl", "first-acquirer", "delivery-count"],
    ),
    (0x71, "delivery-annotations", &[]),
    (0x72, "message-annotations", &[]),
    (
        0x73,
        "properties",
        &[
            "message-id",
            "user-id",
            "to",
            "subject",
            "reply-to",
            "correlation-id",
            "content-type",
            "content-encoding",
            "absolute-expiry-time",
            "creation-time",
            "group-id",
            "group-sequence",
            "reply-to-group-id",
        ],
    ),
    (0x74, "application-properties", &[]),
    (0x75, "data", &[]),
    (0x76, "amqp-sequence", &[]),
    (0x77, "amqp-value", &[]),
    (0x78, "footer", &[]),
];

lazy_static! {
    static ref BY_CODE: FxHashMap<u64, Descriptor> = DESCRIPTORS
        .iter()
        .map(|&(code, name, fields)| (code, Descriptor { name, fields }))
        .collect();
}

/// Looks up a descriptor by its numeric code.
pub fn lookup(code: u64) -> Option<&'static Descriptor> {
    BY_CODE.get(&code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let open = lookup(0x10).unwrap();
        assert_eq!(open.name, "open");
        assert_eq!(open.fields[3], "channel-max");
        assert_eq!(lookup(0x44).unwrap().name, "sasl-outcome");
        assert!(lookup(0x19).is_none());
    }

    #[test]
    fn test_codes_are_unique() {
        assert_eq!(BY_CODE.len(), DESCRIPTORS.len());
    }
}
