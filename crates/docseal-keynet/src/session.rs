//! The authorization handshake.
//!
//! [`establish`] drives both steps against a connected network: request a
//! challenge, sign a statement echoing it, trade the signature for a
//! [`SessionCredential`].

use crate::connection::NetworkHandle;
use crate::error::Result;
use crate::messages::{
    Ability, ResourceAbility, ResourcePattern, SessionCredential, SessionRequest, SignInStatement,
};
use crate::network::KeyNetwork;
use docseal_core::{Blake3Hash, WalletSigner};

/// What a session should be scoped to.
#[derive(Debug, Clone)]
pub struct SessionScope {
    pub resource: ResourcePattern,
    pub ability: Ability,
}

impl SessionScope {
    /// Scope to decryption under one specific condition list.
    pub fn for_conditions(digest: &Blake3Hash) -> Self {
        Self {
            resource: ResourcePattern::conditions(digest),
            ability: Ability::ConditionDecryption,
        }
    }

    /// Scope to decryption under any condition list.
    pub fn any_conditions() -> Self {
        Self {
            resource: ResourcePattern::any(),
            ability: Ability::ConditionDecryption,
        }
    }
}

/// Run the two-step handshake and return the resulting credential.
///
/// Connects the handle first if needed. The signed statement echoes the
/// challenge's uri, nonce, and timestamps verbatim; the network rejects
/// any drift.
pub async fn establish<N: KeyNetwork>(
    handle: &NetworkHandle<N>,
    signer: &WalletSigner,
    scope: SessionScope,
) -> Result<SessionCredential> {
    let info = handle.connect().await?;
    let address = signer.address();
    let requests = vec![ResourceAbility {
        resource: scope.resource,
        ability: scope.ability,
    }];

    let request = SessionRequest {
        address,
        chain: handle.chain().to_string(),
        requests: requests.clone(),
    };
    let challenge = handle.network().begin_session(&request).await?;
    tracing::debug!("Received session challenge {:?}", challenge.challenge_id);

    let statement = SignInStatement {
        uri: info.session_uri.clone(),
        address,
        public_key: signer.public_key(),
        chain: handle.chain().to_string(),
        requests,
        nonce: challenge.nonce.clone(),
        issued_at: challenge.issued_at,
        expiration: challenge.expires_at,
    };
    let signature = signer.sign(&statement.signing_bytes());

    handle
        .network()
        .complete_session(&challenge.challenge_id, &statement, &signature)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KeynetError;
    use crate::network::NetworkConfig;
    use crate::stub::StubNetwork;

    fn handle() -> NetworkHandle<StubNetwork> {
        NetworkHandle::new(StubNetwork::new(), NetworkConfig::default())
    }

    #[tokio::test]
    async fn test_handshake_yields_usable_credential() {
        let handle = handle();
        let signer = WalletSigner::from_seed(&[0x61u8; 32]);
        let digest = Blake3Hash::hash(b"some conditions");

        let credential = establish(&handle, &signer, SessionScope::for_conditions(&digest))
            .await
            .unwrap();

        assert_eq!(credential.address(), signer.address());
        assert!(credential.covers(&digest, Ability::ConditionDecryption));
        assert!(!credential.covers(&Blake3Hash::hash(b"other"), Ability::ConditionDecryption));
    }

    #[tokio::test]
    async fn test_wildcard_scope_covers_any_conditions() {
        let handle = handle();
        let signer = WalletSigner::from_seed(&[0x62u8; 32]);

        let credential = establish(&handle, &signer, SessionScope::any_conditions())
            .await
            .unwrap();

        assert!(credential.covers(&Blake3Hash::hash(b"a"), Ability::ConditionDecryption));
        assert!(credential.covers(&Blake3Hash::hash(b"b"), Ability::ConditionDecryption));
    }

    #[tokio::test]
    async fn test_tampered_statement_is_rejected() {
        let handle = handle();
        let signer = WalletSigner::from_seed(&[0x63u8; 32]);

        let info = handle.connect().await.unwrap();
        let requests = vec![ResourceAbility {
            resource: ResourcePattern::any(),
            ability: Ability::ConditionDecryption,
        }];
        let request = SessionRequest {
            address: signer.address(),
            chain: handle.chain().to_string(),
            requests: requests.clone(),
        };
        let challenge = handle.network().begin_session(&request).await.unwrap();

        // Statement carries a nonce the network never issued.
        let statement = SignInStatement {
            uri: info.session_uri.clone(),
            address: signer.address(),
            public_key: signer.public_key(),
            chain: handle.chain().to_string(),
            requests,
            nonce: "forged-nonce".to_string(),
            issued_at: challenge.issued_at,
            expiration: challenge.expires_at,
        };
        let signature = signer.sign(&statement.signing_bytes());

        let err = handle
            .network()
            .complete_session(&challenge.challenge_id, &statement, &signature)
            .await
            .unwrap_err();
        assert!(matches!(err, KeynetError::Auth(_)));
    }

    #[tokio::test]
    async fn test_expired_challenge_is_rejected() {
        let network = StubNetwork::new().with_session_ttl(-1);
        let handle = NetworkHandle::new(network, NetworkConfig::default());
        let signer = WalletSigner::from_seed(&[0x64u8; 32]);

        let err = establish(&handle, &signer, SessionScope::any_conditions())
            .await
            .unwrap_err();
        assert!(matches!(err, KeynetError::Auth(_)));
    }

    #[tokio::test]
    async fn test_signature_from_wrong_wallet_is_rejected() {
        let handle = handle();
        let signer = WalletSigner::from_seed(&[0x65u8; 32]);
        let other = WalletSigner::from_seed(&[0x66u8; 32]);

        let info = handle.connect().await.unwrap();
        let requests = vec![ResourceAbility {
            resource: ResourcePattern::any(),
            ability: Ability::ConditionDecryption,
        }];
        let request = SessionRequest {
            address: signer.address(),
            chain: handle.chain().to_string(),
            requests: requests.clone(),
        };
        let challenge = handle.network().begin_session(&request).await.unwrap();

        let statement = SignInStatement {
            uri: info.session_uri.clone(),
            address: signer.address(),
            public_key: signer.public_key(),
            chain: handle.chain().to_string(),
            requests,
            nonce: challenge.nonce.clone(),
            issued_at: challenge.issued_at,
            expiration: challenge.expires_at,
        };
        // Signed by a wallet whose key is not the one embedded in the
        // statement.
        let signature = other.sign(&statement.signing_bytes());

        let err = handle
            .network()
            .complete_session(&challenge.challenge_id, &statement, &signature)
            .await
            .unwrap_err();
        assert!(matches!(err, KeynetError::Auth(_)));
    }
}
