//! Tests for key derivation

use walletgen::crypto::keys::*;
use walletgen::crypto::mnemonic::{self, Mnemonic};
use walletgen::Error;

const VECTOR_1_SEED: &str = "000102030405060708090a0b0c0d0e0f";

fn vector_1_master() -> ExtendedKey {
    ExtendedKey::master_from_bytes(&hex::decode(VECTOR_1_SEED).unwrap()).unwrap()
}

#[test]
fn test_bip32_vector_1_chain() {
    let m = vector_1_master();
    assert_eq!(
        m.to_xprv().unwrap(),
        "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi"
    );
    assert_eq!(
        m.to_xpub(),
        "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8"
    );

    let m_0h = m.derive_child(HARDENED_OFFSET).unwrap();
    assert_eq!(
        m_0h.to_xprv().unwrap(),
        "xprv9uHRZZhk6KAJC1avXpDAp4MDc3sQKNxDiPvvkX8Br5ngLNv1TxvUxt4cV1rGL5hj6KCesnDYUhd7oWgT11eZG7XnxHrnYeSvkzY7d2bhkJ7"
    );
    assert_eq!(
        m_0h.to_xpub(),
        "xpub68Gmy5EdvgibQVfPdqkBBCHxA5htiqg55crXYuXoQRKfDBFA1WEjWgP6LHhwBZeNK1VTsfTFUHCdrfp1bgwQ9xv5ski8PX9rL2dZXvgGDnw"
    );

    let m_0h_1 = m_0h.derive_child(1).unwrap();
    assert_eq!(
        m_0h_1.to_xprv().unwrap(),
        "xprv9wTYmMFdV23N2TdNG573QoEsfRrWKQgWeibmLntzniatZvR9BmLnvSxqu53Kw1UmYPxLgboyZQaXwTCg8MSY3H2EU4pWcQDnRnrVA1xe8fs"
    );
    assert_eq!(
        m_0h_1.to_xpub(),
        "xpub6ASuArnXKPbfEwhqN6e3mwBcDTgzisQN1wXN9BJcM47sSikHjJf3UFHKkNAWbWMiGj7Wf5uMash7SyYq527Hqck2AxYysAA7xmALppuCkwQ"
    );

    let m_0h_1_2h = m_0h_1.derive_child(HARDENED_OFFSET + 2).unwrap();
    assert_eq!(
        m_0h_1_2h.to_xprv().unwrap(),
        "xprv9z4pot5VBttmtdRTWfWQmoH1taj2axGVzFqSb8C9xaxKymcFzXBDptWmT7FwuEzG3ryjH4ktypQSAewRiNMjANTtpgP4mLTj34bhnZX7UiM"
    );

    let m_0h_1_2h_2 = m_0h_1_2h.derive_child(2).unwrap();
    assert_eq!(
        m_0h_1_2h_2.to_xpub(),
        "xpub6FHa3pjLCk84BayeJxFW2SP4XRrFd1JYnxeLeU8EqN3vDfZmbqBqaGJAyiLjTAwm6ZLRQUMv1ZACTj37sR62cfN7fe5JnJ7dh8zL4fiyLHV"
    );
}

#[test]
fn test_public_derivation_matches_private() {
    let m_0h = vector_1_master().derive_child(HARDENED_OFFSET).unwrap();

    let from_private = m_0h.derive_child(1).unwrap().neuter();
    let from_public = m_0h.neuter().derive_child(1).unwrap();

    assert_eq!(from_private, from_public);
}

#[test]
fn test_hardened_from_public_fails() {
    let public = vector_1_master().neuter();

    let err = public.derive_child(HARDENED_OFFSET).unwrap_err();
    assert!(matches!(err, Error::HardenedDerivationFromPublic(HARDENED_OFFSET)));
}

#[test]
fn test_extended_key_base58_round_trip() {
    let m_0h = vector_1_master().derive_child(HARDENED_OFFSET).unwrap();

    let parsed = ExtendedKey::from_base58(&m_0h.to_xprv().unwrap()).unwrap();
    assert_eq!(parsed, m_0h);

    let parsed = ExtendedKey::from_base58(&m_0h.to_xpub()).unwrap();
    assert!(!parsed.is_private());
    assert_eq!(parsed.public_key(), m_0h.public_key());
}

#[test]
fn test_account_paths_from_mnemonic() {
    let mnemonic = Mnemonic::parse(
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
    )
    .unwrap();
    let seed = mnemonic::to_seed(&mnemonic, "");
    let master = ExtendedKey::master(&seed).unwrap();

    let leaf = derive_account_path(&master, Purpose::Bip84).unwrap();
    assert_eq!(
        hex::encode(leaf.public_key().serialize()),
        "0330d54fd0dd420a6e5f8d3624f5f3482cae350f79d5f0753bf5beef9c2d91af3c"
    );

    let parsed: DerivationPath = "m/84'/0'/0'/0/0".parse().unwrap();
    assert_eq!(derive_path(&master, &parsed).unwrap(), leaf);
}

#[test]
fn test_each_purpose_yields_a_distinct_key() {
    let master = vector_1_master();
    let keys: Vec<_> = Purpose::ALL
        .iter()
        .map(|purpose| derive_account_path(&master, *purpose).unwrap().public_key())
        .collect();

    for (i, a) in keys.iter().enumerate() {
        for b in &keys[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn test_bip32_vector_5_rejected() {
    let invalid = [
        // pubkey version / prvkey mismatch
        "xpub661MyMwAqRbcEYS8w7XLSVeEsBXy79zSzH1J8vCdxAZningWLdN3zgtU6LBpB85b3D2yc8sfvZU521AAwdZafEz7mnzBBsz4wKY5fTtTQBm",
        // prvkey version / pubkey mismatch
        "xprv9s21ZrQH143K24Mfq5zL5MhWK9hUhhGbd45hLXo2Pq2oqzMMo63oStZzFGTQQD3dC4H2D5GBj7vWvSQaaBv5cxi9gafk7NF3pnBju6dwKvH",
        // invalid pubkey prefix 04
        "xpub661MyMwAqRbcEYS8w7XLSVeEsBXy79zSzH1J8vCdxAZningWLdN3zgtU6Txnt3siSujt9RCVYsx4qHZGc62TG4McvMGcAUjeuwZdduYEvFn",
        // invalid prvkey prefix 04
        "xprv9s21ZrQH143K24Mfq5zL5MhWK9hUhhGbd45hLXo2Pq2oqzMMo63oStZzFGpWnsj83BHtEy5Zt8CcDr1UiRXuWCmTQLxEK9vbz5gPstX92JQ",
        // invalid pubkey prefix 01
        "xpub661MyMwAqRbcEYS8w7XLSVeEsBXy79zSzH1J8vCdxAZningWLdN3zgtU6N8ZMMXctdiCjxTNq964yKkwrkBJJwpzZS4HS2fxvyYUA4q2Xe4",
        // invalid prvkey prefix 01
        "xprv9s21ZrQH143K24Mfq5zL5MhWK9hUhhGbd45hLXo2Pq2oqzMMo63oStZzFAzHGBP2UuGCqWLTAPLcMtD9y5gkZ6Eq3Rjuahrv17fEQ3Qen6J",
        // zero depth with non-zero parent fingerprint
        "xprv9s2SPatNQ9Vc6GTbVMFPFo7jsaZySyzk7L8n2uqKXJen3KUmvQNTuLh3fhZMBoG3G4ZW1N2kZuHEPY53qmbZzCHshoQnNf4GvELZfqTUrcv",
        "xpub661no6RGEX3uJkY4bNnPcw4URcQTrSibUZ4NqJEw5eBkv7ovTwgiT91XX27VbEXGENhYRCf7hyEbWrR3FewATdCEebj6znwMfQkhRYHRLpJ",
        // zero depth with non-zero index
        "xprv9s21ZrQH4r4TsiLvyLXqM9P7k1K3EYhA1kkD6xuquB5i39AU8KF42acDyL3qsDbU9NmZn6MsGSUYZEsuoePmjzsB3eFKSUEh3Gu1N3cqVUN",
        "xpub661MyMwAuDcm6CRQ5N4qiHKrJ39Xe1R1NyfouMKTTWcguwVcfrZJaNvhpebzGerh7gucBvzEQWRugZDuDXjNDRmXzSZe4c7mnTK97pTvGS8",
        // unknown version
        "DMwo58pR1QLEFihHiXPVykYB6fJmsTeHvyTp7hRThAtCX8CvYzgPcn8XnmdfHGMQzT7ayAmfo4z3gY5KfbrZWZ6St24UVf2Qgo6oujFktLHdHY4",
        "DMwo58pR1QLEFihHiXPVykYB6fJmsTeHvyTp7hRThAtCX8CvYzgPcn8XnmdfHPmHJiEDXkTiJTVV9rHEBUem2mwVbbNfvT2MTcAqj3nesx8uBf9",
        // private key 0 and n
        "xprv9s21ZrQH143K24Mfq5zL5MhWK9hUhhGbd45hLXo2Pq2oqzMMo63oStZzF93Y5wvzdUayhgkkFoicQZcP3y52uPPxFnfoLZB21Teqt1VvEHx",
        "xprv9s21ZrQH143K24Mfq5zL5MhWK9hUhhGbd45hLXo2Pq2oqzMMo63oStZzFAzHGBP2UuGCqWLTAPLcMtD5SDKr24z3aiUvKr9bJpdrcLg1y3G",
        // point not on the curve
        "xpub661MyMwAqRbcEYS8w7XLSVeEsBXy79zSzH1J8vCdxAZningWLdN3zgtU6Q5JXayek4PRsn35jii4veMimro1xefsM58PgBMrvdYre8QyULY",
        // bad checksum
        "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHL",
    ];

    for encoded in invalid {
        assert!(
            matches!(ExtendedKey::from_base58(encoded), Err(Error::InvalidKey(_))),
            "accepted {}",
            encoded
        );
    }
}
