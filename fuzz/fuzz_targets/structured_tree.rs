#![no_main]

use arbitrary::Arbitrary;
use ber_harness::{Harness, TerminalState};
use ber_wire::tlv::{encode_indefinite, encode_tlv};
use ber_wire::{Class, Identifier};
use libfuzzer_sys::fuzz_target;

/// Nesting below this always materializes under the default depth limit.
const SAFE_DEPTH: usize = 60;

#[derive(Debug, Arbitrary)]
enum Node {
    Null,
    Boolean(bool),
    Integer(i64),
    OctetString(Vec<u8>),
    Utf8(String),
    Sequence(Vec<Node>),
    IndefiniteSequence(Vec<Node>),
    Context { tag: u16, children: Vec<Node> },
}

impl Node {
    fn depth(&self) -> usize {
        match self {
            Node::Sequence(children)
            | Node::IndefiniteSequence(children)
            | Node::Context { children, .. } => {
                1 + children.iter().map(Node::depth).max().unwrap_or(0)
            }
            _ => 0,
        }
    }

    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            Node::Null => encode_tlv(Identifier::universal(5, false), &[], out),
            Node::Boolean(value) => {
                encode_tlv(Identifier::universal(1, false), &[u8::from(*value)], out);
            }
            Node::Integer(value) => {
                encode_tlv(Identifier::universal(2, false), &minimal(*value), out);
            }
            Node::OctetString(data) => encode_tlv(Identifier::universal(4, false), data, out),
            Node::Utf8(text) => encode_tlv(Identifier::universal(12, false), text.as_bytes(), out),
            Node::Sequence(children) => {
                encode_tlv(Identifier::universal(16, true), &encode_all(children), out);
            }
            Node::IndefiniteSequence(children) => {
                encode_indefinite(Identifier::universal(16, true), &encode_all(children), out);
            }
            Node::Context { tag, children } => {
                let id = Identifier::new(Class::ContextSpecific, true, u64::from(*tag));
                encode_tlv(id, &encode_all(children), out);
            }
        }
    }
}

fn encode_all(nodes: &[Node]) -> Vec<u8> {
    let mut out = Vec::new();
    for node in nodes {
        node.encode(&mut out);
    }
    out
}

/// Minimal two's-complement octets.
fn minimal(value: i64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let mut start = 0;
    while start < 7
        && ((bytes[start] == 0x00 && bytes[start + 1] & 0x80 == 0)
            || (bytes[start] == 0xFF && bytes[start + 1] & 0x80 != 0))
    {
        start += 1;
    }
    bytes[start..].to_vec()
}

// Fuzz target: well-formed trees through the harness.
//
// Builds valid BER from an arbitrary value tree and checks the harness
// accepts all of it:
// - no unexpected failure, ever
// - shallow enough trees never end in an expected error
// - exactly min(values, cap) values are materialized
fuzz_target!(|nodes: Vec<Node>| {
    let data = encode_all(&nodes);
    let harness = Harness::default();
    let report = harness.run(&data).unwrap();

    let cap = harness.config().iteration_cap.get();
    assert!(report.materialized <= cap);

    if nodes.iter().all(|node| node.depth() < SAFE_DEPTH) {
        assert_ne!(report.state, TerminalState::ExpectedError, "{nodes:?}");
        assert_eq!(report.materialized, nodes.len().min(cap));
    }
});
