//! Loader for the published vectors in `testdata/vectors.yaml`.
//!
//! Shared by the library tests and the `glome` binary tests.

use std::{format, string::String, string::ToString, vec::Vec};

use yaml_rust2::{Yaml, YamlLoader};

/// One party of a test vector.
#[derive(Debug)]
pub struct Party {
    /// Raw private key.
    pub private: [u8; 32],
    /// Public key derived from `private`.
    pub public: [u8; 32],
}

/// A published GLOME test vector.
#[derive(Debug)]
#[allow(missing_docs)]
pub struct TestVector {
    pub name: String,
    pub sender: Party,
    pub receiver: Party,
    pub counter: u8,
    pub message: String,
    pub tag: [u8; 32],
}

fn bytes32(value: &Yaml) -> [u8; 32] {
    hex::decode(value.as_str().expect("value should be a hex string"))
        .expect("value should be valid hex")
        .try_into()
        .expect("value should be 32 bytes")
}

impl From<&Yaml> for Party {
    fn from(party: &Yaml) -> Self {
        Party {
            private: bytes32(&party["private-key"]),
            public: bytes32(&party["public-key"]),
        }
    }
}

impl From<&Yaml> for TestVector {
    fn from(case: &Yaml) -> Self {
        let (sender, receiver) = match case["sender"].as_str() {
            Some("alice") => ("alice", "bob"),
            Some("bob") => ("bob", "alice"),
            other => panic!("unexpected sender {:?}", other),
        };
        TestVector {
            name: format!("vector-{:02}", case["vector"].as_i64().unwrap()),
            sender: (&case[sender]).into(),
            receiver: (&case[receiver]).into(),
            counter: case["counter"].as_i64().unwrap().try_into().unwrap(),
            message: case["message"].as_str().unwrap().to_string(),
            tag: bytes32(&case["tag"]),
        }
    }
}

/// Loads the vectors in `testdata/vectors.yaml`.
pub fn test_vectors() -> Vec<TestVector> {
    let content = include_str!("../testdata/vectors.yaml");
    let cases = &YamlLoader::load_from_str(content).expect("test vectors should be yaml")[0];
    cases
        .as_vec()
        .expect("top level should be a list")
        .iter()
        .map(TestVector::from)
        .collect()
}
