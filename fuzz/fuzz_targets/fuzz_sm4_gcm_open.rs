#![no_main]
use libfuzzer_sys::fuzz_target;

// Layout: key[16] || nonce_len[1] || nonce || tag[16] || aad_len[1] || aad || ciphertext
fuzz_target!(|data: &[u8]| {
    if data.len() < 34 {
        return;
    }
    let (key, rest) = data.split_at(16);
    let nonce_len = (rest[0] as usize).min(rest.len() - 1);
    let (nonce, rest) = rest[1..].split_at(nonce_len);
    if rest.len() < 17 {
        return;
    }
    let (tag, rest) = rest.split_at(16);
    let aad_len = (rest[0] as usize).min(rest.len() - 1);
    let (aad, ciphertext) = rest[1..].split_at(aad_len);

    // Forged input must never authenticate.
    if let Ok(pt) = sm4gcm_crypto::sm4_gcm_open(key, nonce, ciphertext, aad, tag) {
        let (ct, expected) = sm4gcm_crypto::sm4_gcm_seal(key, nonce, &pt, aad).unwrap();
        assert_eq!(ct, ciphertext);
        assert_eq!(&expected[..], tag);
    }
});
