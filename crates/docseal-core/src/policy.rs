//! Access-control policies gating decryption.
//!
//! A policy is an ordered list of conditions the key network evaluates
//! against the caller's proven address before releasing plaintext. The
//! JSON shape (camelCase field names, bare array at the top level) is the
//! wire format the network and the published envelope share.

use serde::{Deserialize, Serialize};

use crate::crypto::{Blake3Hash, ChainAddress};

/// Placeholder parameter substituted with the caller's proven address
/// during server-side evaluation.
pub const CALLER_ADDRESS_PLACEHOLDER: &str = ":userAddress";

/// Comparison operator applied to a condition's evaluated value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparator {
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessThanOrEqual,
}

/// The test applied to a condition's evaluated value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnValueTest {
    pub comparator: Comparator,
    pub value: String,
}

/// A single access-control condition.
///
/// The base-coin form (empty contract address, type, and method) evaluates
/// the substituted parameters directly; contract-backed forms are carried
/// verbatim for the network to evaluate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessControlCondition {
    pub contract_address: String,
    pub standard_contract_type: String,
    pub chain: String,
    pub method: String,
    pub parameters: Vec<String>,
    pub return_value_test: ReturnValueTest,
}

/// An ordered condition list.
///
/// Order is significant: `[A, B]` and `[B, A]` are distinct policies with
/// distinct digests, matching how the evaluator treats them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessPolicy(Vec<AccessControlCondition>);

impl AccessPolicy {
    /// Create from an explicit condition list.
    pub fn new(conditions: Vec<AccessControlCondition>) -> Self {
        Self(conditions)
    }

    /// Build the one-condition policy admitting exactly one address.
    ///
    /// Deterministic: the same address and chain always produce the same
    /// policy. The recipient address lands in the return value test in its
    /// canonical display form; the parameters carry the caller placeholder
    /// for the evaluator to substitute. No validation happens here beyond
    /// what [`ChainAddress`] itself enforces.
    pub fn single_recipient(recipient: &ChainAddress, chain: &str) -> Self {
        Self(vec![AccessControlCondition {
            contract_address: String::new(),
            standard_contract_type: String::new(),
            chain: chain.to_string(),
            method: String::new(),
            parameters: vec![CALLER_ADDRESS_PLACEHOLDER.to_string()],
            return_value_test: ReturnValueTest {
                comparator: Comparator::Equal,
                value: recipient.to_string(),
            },
        }])
    }

    /// The conditions in evaluation order.
    pub fn conditions(&self) -> &[AccessControlCondition] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Stable identity of this policy: Blake3 over its CBOR encoding.
    ///
    /// Used as the session resource identifier and as the policy-binding
    /// input when sealing.
    pub fn digest(&self) -> Blake3Hash {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf).expect("CBOR serialization failed");
        Blake3Hash::hash(&buf)
    }
}
