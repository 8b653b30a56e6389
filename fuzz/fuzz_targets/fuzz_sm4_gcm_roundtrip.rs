#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 17 {
        return;
    }
    let (key, rest) = data.split_at(16);
    let nonce_len = (rest[0] as usize % 32).max(1).min(rest.len() - 1);
    if nonce_len == 0 {
        return;
    }
    let (nonce, rest) = rest[1..].split_at(nonce_len);
    let (aad, plaintext) = rest.split_at(rest.len() / 3);

    let gcm = sm4gcm_crypto::Sm4Gcm::new(key).unwrap();
    let (ct, tag) = gcm.seal(nonce, plaintext, aad).unwrap();
    assert_eq!(ct.len(), plaintext.len());
    assert_eq!(gcm.open(nonce, &ct, aad, &tag).unwrap(), plaintext);
});
