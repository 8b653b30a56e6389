//! SM4-GCM test vectors.
//!
//! Vector files are stored in `tests/vectors/` using the Wycheproof AEAD
//! schema, so additional groups can be dropped in without code changes.

#![allow(dead_code)]

use serde::Deserialize;
use sm4gcm_crypto::{CryptoError, GhashBackend, RoundFunction, Sm4Gcm, Sm4GcmConfig};
use std::path::PathBuf;

#[derive(Deserialize)]
struct VectorFile<G> {
    algorithm: String,
    #[serde(rename = "numberOfTests")]
    number_of_tests: usize,
    #[serde(rename = "testGroups")]
    test_groups: Vec<G>,
}

#[derive(Deserialize)]
struct AeadGroup {
    #[serde(rename = "ivSize")]
    iv_size: usize,
    #[serde(rename = "keySize")]
    key_size: usize,
    #[serde(rename = "tagSize")]
    tag_size: usize,
    tests: Vec<AeadTest>,
}

#[derive(Deserialize)]
struct AeadTest {
    #[serde(rename = "tcId")]
    tc_id: usize,
    #[serde(default)]
    comment: String,
    key: String,
    iv: String,
    aad: String,
    msg: String,
    ct: String,
    tag: String,
    result: String,
}

fn hex_to_bytes(s: &str) -> Vec<u8> {
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
        .collect()
}

fn load<G: for<'de> Deserialize<'de>>(name: &str) -> VectorFile<G> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("vectors")
        .join(name);
    let data = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("reading {}: {e}", path.display()));
    serde_json::from_str(&data).unwrap()
}

fn configs() -> Vec<Sm4GcmConfig> {
    [RoundFunction::Direct, RoundFunction::Table, RoundFunction::CompactTable]
        .into_iter()
        .flat_map(|round| {
            [GhashBackend::ConstantTime, GhashBackend::Table4Bit]
                .into_iter()
                .map(move |backend| {
                    Sm4GcmConfig::builder()
                        .round_function(round)
                        .ghash_backend(backend)
                        .build()
                })
        })
        .collect()
}

#[test]
fn sm4_gcm_vectors() {
    let file: VectorFile<AeadGroup> = load("sm4_gcm.json");
    assert_eq!(file.algorithm, "SM4-GCM");

    let mut run = 0;
    for group in &file.test_groups {
        assert_eq!(group.key_size, 128);
        assert_eq!(group.tag_size, 128);
        for tc in &group.tests {
            let key = hex_to_bytes(&tc.key);
            let iv = hex_to_bytes(&tc.iv);
            let aad = hex_to_bytes(&tc.aad);
            let msg = hex_to_bytes(&tc.msg);
            let ct = hex_to_bytes(&tc.ct);
            let tag = hex_to_bytes(&tc.tag);

            for config in configs() {
                let gcm = Sm4Gcm::with_config(&key, config).unwrap();
                match tc.result.as_str() {
                    "valid" => {
                        let (got_ct, got_tag) = gcm.seal(&iv, &msg, &aad).unwrap();
                        assert_eq!(got_ct, ct, "tc {} ({config:?})", tc.tc_id);
                        assert_eq!(got_tag.to_vec(), tag, "tc {} ({config:?})", tc.tc_id);
                        let pt = gcm.open(&iv, &ct, &aad, &tag).unwrap();
                        assert_eq!(pt, msg, "tc {}", tc.tc_id);
                    }
                    "invalid" => {
                        assert_eq!(
                            gcm.open(&iv, &ct, &aad, &tag),
                            Err(CryptoError::AuthenticationFailure),
                            "tc {} ({}) must be rejected",
                            tc.tc_id,
                            tc.comment
                        );
                    }
                    other => panic!("tc {}: unknown result {other}", tc.tc_id),
                }
            }
            run += 1;
        }
    }
    assert_eq!(run, file.number_of_tests);
}
