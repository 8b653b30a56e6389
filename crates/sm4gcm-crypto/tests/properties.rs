//! Behavioral properties of SM4 and SM4-GCM that hold for arbitrary inputs.

use proptest::prelude::*;
use sm4gcm_crypto::{
    sm4_gcm_open, sm4_gcm_seal, CryptoError, GhashBackend, RoundFunction, Sm4Gcm, Sm4GcmConfig,
    Sm4Key,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn round_functions_agree(key in any::<[u8; 16]>(), block in any::<[u8; 16]>()) {
        let direct = Sm4Key::with_round_function(&key, RoundFunction::Direct).unwrap();
        let table = Sm4Key::with_round_function(&key, RoundFunction::Table).unwrap();
        let compact = Sm4Key::with_round_function(&key, RoundFunction::CompactTable).unwrap();
        let expected = direct.encrypt(&block);
        prop_assert_eq!(table.encrypt(&block), expected);
        prop_assert_eq!(compact.encrypt(&block), expected);
    }

    #[test]
    fn round_transform_agrees(x in any::<u32>()) {
        let direct = RoundFunction::Direct.apply(x);
        prop_assert_eq!(RoundFunction::Table.apply(x), direct);
        prop_assert_eq!(RoundFunction::CompactTable.apply(x), direct);
    }

    #[test]
    fn seal_open_roundtrip(
        key in any::<[u8; 16]>(),
        nonce in prop::collection::vec(any::<u8>(), 1..40),
        plaintext in prop::collection::vec(any::<u8>(), 0..200),
        aad in prop::collection::vec(any::<u8>(), 0..80),
    ) {
        let (ct, tag) = sm4_gcm_seal(&key, &nonce, &plaintext, &aad).unwrap();
        prop_assert_eq!(ct.len(), plaintext.len());
        let pt = sm4_gcm_open(&key, &nonce, &ct, &aad, &tag).unwrap();
        prop_assert_eq!(pt, plaintext);
    }

    #[test]
    fn single_bit_flip_is_rejected(
        key in any::<[u8; 16]>(),
        plaintext in prop::collection::vec(any::<u8>(), 1..100),
        bit in any::<prop::sample::Index>(),
        flip_tag in any::<bool>(),
    ) {
        let nonce = [0x24u8; 12];
        let (mut ct, mut tag) = sm4_gcm_seal(&key, &nonce, &plaintext, b"aad").unwrap();
        if flip_tag {
            let i = bit.index(tag.len() * 8);
            tag[i / 8] ^= 1 << (i % 8);
        } else {
            let i = bit.index(ct.len() * 8);
            ct[i / 8] ^= 1 << (i % 8);
        }
        prop_assert_eq!(
            sm4_gcm_open(&key, &nonce, &ct, b"aad", &tag),
            Err(CryptoError::AuthenticationFailure)
        );
    }
}

#[test]
fn roundtrip_every_length_and_backend() {
    let key = [0x3du8; 16];
    for backend in [GhashBackend::ConstantTime, GhashBackend::Table4Bit] {
        let config = Sm4GcmConfig::builder().ghash_backend(backend).build();
        let gcm = Sm4Gcm::with_config(&key, config).unwrap();
        let reference = Sm4Gcm::new(&key).unwrap();
        for len in 0..=70usize {
            let pt: Vec<u8> = (0..len).map(|i| i as u8).collect();
            let aad: Vec<u8> = (0..len % 19).map(|i| 0xa0 ^ i as u8).collect();
            let nonce = [len as u8; 12];
            let (ct, tag) = gcm.seal(&nonce, &pt, &aad).unwrap();
            // Backends must agree byte for byte.
            assert_eq!(reference.seal(&nonce, &pt, &aad).unwrap(), (ct.clone(), tag));
            assert_eq!(gcm.open(&nonce, &ct, &aad, &tag).unwrap(), pt);
        }
    }
}

#[test]
fn context_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Sm4Gcm>();
    assert_send_sync::<Sm4Key>();

    let gcm = Sm4Gcm::new(&[0x77u8; 16]).unwrap();
    let expected: Vec<_> = (0..8u8)
        .map(|i| gcm.seal(&[i; 12], &[i; 100], b"shared").unwrap())
        .collect();

    std::thread::scope(|s| {
        for (i, want) in expected.iter().enumerate() {
            let gcm = &gcm;
            s.spawn(move || {
                let i = i as u8;
                for _ in 0..50 {
                    let got = gcm.seal(&[i; 12], &[i; 100], b"shared").unwrap();
                    assert_eq!(&got, want);
                    let pt = gcm.open(&[i; 12], &got.0, b"shared", &got.1).unwrap();
                    assert_eq!(pt, vec![i; 100]);
                }
            });
        }
    });
}

#[test]
fn zero_block_encryption_has_no_hidden_state() {
    let cipher = Sm4Key::new(&[0u8; 16]).unwrap();
    let first = cipher.encrypt(&[0u8; 16]);
    // Interleave other work between the two calls.
    let _ = cipher.encrypt(&[0xffu8; 16]);
    let second = cipher.encrypt(&[0u8; 16]);
    assert_eq!(first, second);
    assert_ne!(first, [0u8; 16]);
}
