//! In-process key network for tests.
//!
//! Holds a real sealing secret and runs the same checks a live network
//! would: challenge bookkeeping, credential verification, condition
//! evaluation, and binding-checked opening. Nothing is short-circuited,
//! so negative-path tests exercise real refusals rather than stubbed
//! ones.
//!
//! All state is in-process and lost on drop. Thread-safe; counters and
//! the offline flag make connection-lifecycle behavior observable.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::crypto::{SealedBox, SealingBinding, X25519StaticSecret};
use crate::error::{KeynetError, Result};
use crate::messages::{
    Ability, ChallengeId, CredentialTag, DecryptRequest, SessionChallenge, SessionCredential,
    SessionRequest, SignInStatement,
};
use crate::network::{KeyNetwork, NetworkInfo, DEFAULT_CHAIN};
use docseal_core::{
    AccessControlCondition, Blake3Hash, ChainAddress, Comparator, WalletSignature,
    CALLER_ADDRESS_PLACEHOLDER,
};

/// URI the stub hands out for signed statements.
pub const STUB_SESSION_URI: &str = "docseal://session";

const SEALING_SECRET_CONTEXT: &str = "docseal-stub-v1-sealing-secret";
const ATTESTATION_KEY_CONTEXT: &str = "docseal-stub-v1-attestation-key";
const NONCE_CONTEXT: &str = "docseal-stub-v1-nonce";

struct IssuedChallenge {
    nonce: String,
    issued_at: i64,
    expires_at: i64,
}

/// An in-process [`KeyNetwork`].
pub struct StubNetwork {
    sealing_secret: X25519StaticSecret,
    attestation_key: [u8; 32],
    chain: String,
    session_ttl_millis: i64,
    offline: AtomicBool,
    epoch: AtomicU64,
    info_requests: AtomicU64,
    disconnects: AtomicU64,
    challenges: Mutex<HashMap<ChallengeId, IssuedChallenge>>,
}

impl StubNetwork {
    /// Create with a random sealing secret.
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Create with keys derived from a fixed seed. The same seed always
    /// yields the same sealing key, so sealed payloads can outlive the
    /// instance that sealed them.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        let sealing_secret = X25519StaticSecret::from_bytes(
            *Blake3Hash::derive_key(SEALING_SECRET_CONTEXT, &seed).as_bytes(),
        );
        let attestation_key = *Blake3Hash::derive_key(ATTESTATION_KEY_CONTEXT, &seed).as_bytes();
        Self {
            sealing_secret,
            attestation_key,
            chain: DEFAULT_CHAIN.to_string(),
            session_ttl_millis: crate::messages::SESSION_TTL_MILLIS,
            offline: AtomicBool::new(false),
            epoch: AtomicU64::new(0),
            info_requests: AtomicU64::new(0),
            disconnects: AtomicU64::new(0),
            challenges: Mutex::new(HashMap::new()),
        }
    }

    /// Serve a different chain than the default.
    pub fn with_chain(mut self, chain: impl Into<String>) -> Self {
        self.chain = chain.into();
        self
    }

    /// Override the challenge and credential lifetime. A non-positive
    /// value issues challenges that are already expired.
    pub fn with_session_ttl(mut self, millis: i64) -> Self {
        self.session_ttl_millis = millis;
        self
    }

    /// Simulate the network being unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// How many times connection info was fetched.
    pub fn info_request_count(&self) -> u64 {
        self.info_requests.load(Ordering::SeqCst)
    }

    /// How many times the network was told to disconnect.
    pub fn disconnect_count(&self) -> u64 {
        self.disconnects.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(KeynetError::Unreachable("stub network is offline".into()));
        }
        Ok(())
    }

    fn attest(&self, statement: &SignInStatement, signature: &WalletSignature) -> CredentialTag {
        let mut material = statement.signing_bytes();
        material.extend_from_slice(signature.as_bytes());
        CredentialTag::from_bytes(*Blake3Hash::keyed(&self.attestation_key, &material).as_bytes())
    }

    fn verify_credential(&self, credential: &SessionCredential) -> Result<()> {
        let expected = self.attest(&credential.statement, &credential.signature);
        if expected != credential.attestation {
            return Err(KeynetError::Auth(
                "credential was not attested by this network".into(),
            ));
        }
        if credential.is_expired(now_millis()) {
            return Err(KeynetError::Auth("session credential has expired".into()));
        }
        let statement = &credential.statement;
        if statement.public_key.to_address() != statement.address {
            return Err(KeynetError::Auth(
                "credential address does not derive from its public key".into(),
            ));
        }
        statement
            .public_key
            .verify(&statement.signing_bytes(), &credential.signature)
            .map_err(|_| KeynetError::Auth("invalid credential signature".into()))
    }

    /// Evaluate one condition against the caller's address.
    ///
    /// Only the base-coin form (empty contract address, type, and method)
    /// is supported; anything else would need chain state the stub does
    /// not have and evaluates false. The caller placeholder in the first
    /// parameter is substituted with the credential's address before the
    /// comparison. Address comparison is case-insensitive.
    fn evaluate_condition(
        &self,
        condition: &AccessControlCondition,
        caller: &ChainAddress,
    ) -> bool {
        if condition.chain != self.chain {
            return false;
        }
        if !condition.contract_address.is_empty()
            || !condition.standard_contract_type.is_empty()
            || !condition.method.is_empty()
        {
            return false;
        }
        let Some(first) = condition.parameters.first() else {
            return false;
        };
        let resolved = if first == CALLER_ADDRESS_PLACEHOLDER {
            caller.to_string()
        } else {
            first.clone()
        };
        let expected = &condition.return_value_test.value;
        match condition.return_value_test.comparator {
            Comparator::Equal => resolved.eq_ignore_ascii_case(expected),
            Comparator::NotEqual => !resolved.eq_ignore_ascii_case(expected),
            // Ordering comparators apply to balances, not addresses.
            _ => false,
        }
    }
}

impl Default for StubNetwork {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyNetwork for StubNetwork {
    async fn fetch_network_info(&self) -> Result<NetworkInfo> {
        self.check_online()?;
        self.info_requests.fetch_add(1, Ordering::SeqCst);
        Ok(NetworkInfo {
            sealing_key: self.sealing_secret.public_key(),
            session_uri: STUB_SESSION_URI.to_string(),
            chain: self.chain.clone(),
        })
    }

    async fn begin_session(&self, request: &SessionRequest) -> Result<SessionChallenge> {
        self.check_online()?;
        if request.chain != self.chain {
            return Err(KeynetError::Protocol(format!(
                "requested chain {} but this network serves {}",
                request.chain, self.chain
            )));
        }
        if request.requests.is_empty() {
            return Err(KeynetError::Auth("session request carries no grants".into()));
        }

        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let nonce = Blake3Hash::derive_key(NONCE_CONTEXT, &epoch.to_le_bytes()).to_hex();
        let challenge_id = ChallengeId::from_bytes(rand::random());
        let issued_at = now_millis();
        let expires_at = issued_at + self.session_ttl_millis;

        self.challenges.lock().unwrap().insert(
            challenge_id,
            IssuedChallenge {
                nonce: nonce.clone(),
                issued_at,
                expires_at,
            },
        );

        Ok(SessionChallenge {
            challenge_id,
            uri: STUB_SESSION_URI.to_string(),
            nonce,
            issued_at,
            expires_at,
        })
    }

    async fn complete_session(
        &self,
        challenge_id: &ChallengeId,
        statement: &SignInStatement,
        signature: &WalletSignature,
    ) -> Result<SessionCredential> {
        self.check_online()?;

        // Challenges are single-use: taken out of the table here whether
        // or not the rest of the checks pass.
        let issued = self
            .challenges
            .lock()
            .unwrap()
            .remove(challenge_id)
            .ok_or_else(|| KeynetError::Auth("unknown or already used challenge".into()))?;

        if now_millis() >= issued.expires_at {
            return Err(KeynetError::Auth("challenge has expired".into()));
        }
        if statement.nonce != issued.nonce
            || statement.uri != STUB_SESSION_URI
            || statement.issued_at != issued.issued_at
            || statement.expiration != issued.expires_at
        {
            return Err(KeynetError::Auth(
                "statement does not echo the challenge".into(),
            ));
        }
        if statement.chain != self.chain {
            return Err(KeynetError::Protocol(format!(
                "statement names chain {} but this network serves {}",
                statement.chain, self.chain
            )));
        }
        if statement.public_key.to_address() != statement.address {
            return Err(KeynetError::Auth(
                "statement address does not derive from its public key".into(),
            ));
        }
        statement
            .public_key
            .verify(&statement.signing_bytes(), signature)
            .map_err(|_| {
                tracing::warn!("Rejected handshake for {}: bad signature", statement.address);
                KeynetError::Auth("invalid statement signature".into())
            })?;

        Ok(SessionCredential {
            statement: statement.clone(),
            signature: *signature,
            attestation: self.attest(statement, signature),
        })
    }

    async fn open_sealed(&self, request: &DecryptRequest) -> Result<Vec<u8>> {
        self.check_online()?;
        self.verify_credential(&request.credential)?;

        let policy = &request.access_control_conditions;
        let digest = policy.digest();
        if !request
            .credential
            .covers(&digest, Ability::ConditionDecryption)
        {
            return Err(KeynetError::Auth(
                "credential does not cover these conditions".into(),
            ));
        }
        if request.chain != self.chain {
            return Err(KeynetError::Protocol(format!(
                "request names chain {} but this network serves {}",
                request.chain, self.chain
            )));
        }

        // An empty condition list admits nobody.
        let caller = request.credential.address();
        if policy.is_empty()
            || !policy
                .conditions()
                .iter()
                .all(|c| self.evaluate_condition(c, &caller))
        {
            tracing::debug!("Denied decryption for {}", caller);
            return Err(KeynetError::Denied(format!(
                "conditions not satisfied by {caller}"
            )));
        }

        let data_hash = Blake3Hash::from_hex(&request.data_to_encrypt_hash)
            .map_err(|_| KeynetError::Integrity("data hash is not valid hex".into()))?;
        let sealed = SealedBox::from_hex(&request.cipher_text)?;
        let binding = SealingBinding::new(digest, data_hash);
        let plaintext = sealed.open(&self.sealing_secret, &binding)?;

        if Blake3Hash::hash(&plaintext) != data_hash {
            return Err(KeynetError::Integrity(
                "decrypted payload does not match its hash".into(),
            ));
        }
        Ok(plaintext)
    }

    async fn disconnect(&self) -> Result<()> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
