//! Signature provider tests

use eosio_crypto::{is_canonical, verify, KeyType, PrivateKey, PublicKey};
use eosio_primitives::ChainId;
use eosio_sdk::{signing_digest, SignatureProvider, SignatureRequest, SoftkeySignatureProvider};

const WIF: &str = "5KQwrPbwdL6PhXujxW37FSSQZ1JiwsST4cqQzDeyXtP79zkvFD3";

fn request(public_keys: Vec<PublicKey>) -> SignatureRequest {
    SignatureRequest {
        chain_id: ChainId::from_bytes([0x11; 32]),
        serialized_transaction: b"packed transaction bytes".to_vec(),
        public_keys,
    }
}

#[tokio::test]
async fn test_signs_with_every_requested_key() {
    let mut signer = SoftkeySignatureProvider::from_strs([WIF]).unwrap();
    let extra = signer.generate().unwrap();
    assert_eq!(signer.len(), 2);

    let keys = signer.available_keys().await.unwrap();
    let req = request(keys.clone());
    let signatures = signer.sign(&req).await.unwrap();

    assert_eq!(signatures.len(), 2);
    for (signature, key) in signatures.iter().zip(&keys) {
        assert!(is_canonical(signature.data()));
        assert!(verify(&req.digest(), signature, key).unwrap());
    }
    assert!(keys.contains(&extra));
}

#[tokio::test]
async fn test_signs_only_requested_keys() {
    let mut signer = SoftkeySignatureProvider::from_strs([WIF]).unwrap();
    let extra = signer.generate().unwrap();

    let signatures = signer.sign(&request(vec![extra])).await.unwrap();
    assert_eq!(signatures.len(), 1);
    assert!(verify(&request(vec![]).digest(), &signatures[0], &extra).unwrap());
}

#[tokio::test]
async fn test_private_key_formats_are_equivalent() {
    let key: PrivateKey = WIF.parse().unwrap();
    let from_wif = SoftkeySignatureProvider::from_strs([WIF]).unwrap();
    let from_pvt = SoftkeySignatureProvider::from_strs([key.to_string()]).unwrap();
    assert_eq!(
        from_wif.available_keys().await.unwrap(),
        from_pvt.available_keys().await.unwrap()
    );
}

#[tokio::test]
async fn test_signs_with_r1_key() {
    let key = PrivateKey::generate_of(KeyType::R1);
    let signer = SoftkeySignatureProvider::from_strs([key.to_string()]).unwrap();
    let public = key.public_key().unwrap();
    assert_eq!(signer.available_keys().await.unwrap(), vec![public]);

    let req = request(vec![public]);
    let signatures = signer.sign(&req).await.unwrap();
    assert_eq!(signatures[0].key_type(), KeyType::R1);
    assert!(verify(&req.digest(), &signatures[0], &public).unwrap());
}

#[test]
fn test_digest_depends_on_chain() {
    let packed = b"same bytes";
    let a = signing_digest(&ChainId::from_bytes([1; 32]), packed);
    let b = signing_digest(&ChainId::from_bytes([2; 32]), packed);
    assert_ne!(a, b);
}

#[test]
fn test_rejects_malformed_key() {
    assert!(SoftkeySignatureProvider::from_strs(["not a key"]).is_err());
}
