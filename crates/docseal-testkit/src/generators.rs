//! Proptest generators for property-based testing.

use proptest::prelude::*;

use docseal_core::{
    AccessControlCondition, AccessPolicy, Blake3Hash, ChainAddress, Comparator, DocumentMeta,
    ReturnValueTest, WalletSigner, CALLER_ADDRESS_PLACEHOLDER,
};

/// Generate a random wallet signer.
pub fn wallet_signer() -> impl Strategy<Value = WalletSigner> {
    any::<[u8; 32]>().prop_map(|seed| WalletSigner::from_seed(&seed))
}

/// Generate a random chain address.
pub fn chain_address() -> impl Strategy<Value = ChainAddress> {
    any::<[u8; 20]>().prop_map(ChainAddress::from_bytes)
}

/// Generate a random Blake3Hash.
pub fn blake3_hash() -> impl Strategy<Value = Blake3Hash> {
    any::<[u8; 32]>().prop_map(Blake3Hash::from_bytes)
}

/// Generate a chain name.
pub fn chain() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("ethereum".to_string()),
        Just("polygon".to_string()),
        Just("base".to_string()),
        Just("sepolia".to_string()),
    ]
}

/// Generate document bytes of specified max length.
pub fn payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate a file name with a known extension.
pub fn file_name() -> impl Strategy<Value = String> {
    let ext = prop_oneof![Just("pdf"), Just("png"), Just("jpg"), Just("txt")];
    ("[a-z][a-z0-9_-]{0,12}", ext).prop_map(|(stem, ext)| format!("{stem}.{ext}"))
}

/// Generate document metadata, sometimes empty.
pub fn document_meta() -> impl Strategy<Value = DocumentMeta> {
    prop_oneof![
        Just(DocumentMeta::default()),
        file_name().prop_map(DocumentMeta::for_file),
    ]
}

/// Generate a base-coin access condition admitting one address.
pub fn condition() -> impl Strategy<Value = AccessControlCondition> {
    let comparator = prop_oneof![Just(Comparator::Equal), Just(Comparator::NotEqual)];
    (chain_address(), chain(), comparator).prop_map(|(address, chain, comparator)| {
        AccessControlCondition {
            contract_address: String::new(),
            standard_contract_type: String::new(),
            chain,
            method: String::new(),
            parameters: vec![CALLER_ADDRESS_PLACEHOLDER.to_string()],
            return_value_test: ReturnValueTest {
                comparator,
                value: address.to_string(),
            },
        }
    })
}

/// Generate a non-empty access policy.
pub fn access_policy() -> impl Strategy<Value = AccessPolicy> {
    prop::collection::vec(condition(), 1..4).prop_map(AccessPolicy::new)
}

/// Generate a single-recipient policy.
pub fn single_recipient_policy() -> impl Strategy<Value = AccessPolicy> {
    (chain_address(), chain())
        .prop_map(|(recipient, chain)| AccessPolicy::single_recipient(&recipient, &chain))
}

/// Parameters for one sealed-document scenario.
#[derive(Debug, Clone)]
pub struct SealParams {
    pub recipient_seed: [u8; 32],
    pub chain: String,
    pub document: Vec<u8>,
    pub meta: DocumentMeta,
}

impl SealParams {
    /// The recipient's wallet.
    pub fn recipient(&self) -> WalletSigner {
        WalletSigner::from_seed(&self.recipient_seed)
    }

    /// The policy admitting exactly the recipient.
    pub fn policy(&self) -> AccessPolicy {
        AccessPolicy::single_recipient(&self.recipient().address(), &self.chain)
    }
}

impl Arbitrary for SealParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (any::<[u8; 32]>(), chain(), payload(512), document_meta())
            .prop_map(|(recipient_seed, chain, document, meta)| SealParams {
                recipient_seed,
                chain,
                document,
                meta,
            })
            .boxed()
    }
}
