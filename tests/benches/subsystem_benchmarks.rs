//! # Cross-Chain Subsystem Benchmarks
//!
//! | Subsystem | Operation | Target |
//! |-----------|-----------|--------|
//! | qc-02 Header Codec | Decode + hash | < 50µs |
//! | qc-13 Header Sync | Verify one header (n validators) | < 1ms per signer |
//! | qc-13 Header Sync | Batch verify, sequential vs rayon | scales with cores |
//! | qc-04 Trie Proof | Verify inclusion proof | < 100µs |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use qc_02_header_codec::{ConsensusPayload, Header, UnsignedHeader};
use qc_04_trie_proof::{verify_proof, ProofTrie};
use qc_13_header_sync::{verify_batch, verify_header, ConsensusPeers};
use shared_crypto::Secp256k1KeyPair;

fn keys(n: u8) -> Vec<Secp256k1KeyPair> {
    (1..=n)
        .map(|i| Secp256k1KeyPair::from_seed(i).unwrap())
        .collect()
}

fn peers(set: &[Secp256k1KeyPair]) -> ConsensusPeers {
    let payload = ConsensusPayload::with_peers(
        set.iter()
            .enumerate()
            .map(|(i, k)| (i as u32 + 1, k.public_key())),
    );
    ConsensusPeers::from_payload(&payload).unwrap()
}

fn header(height: u32, signers: &[Secp256k1KeyPair]) -> Header {
    let mut h = Header::new(UnsignedHeader {
        version: 1,
        chain_id: 7,
        height,
        timestamp: 1_600_000_000 + height,
        ..Default::default()
    });
    for k in signers {
        h.sign(k);
    }
    h
}

// ============================================================================
// QC-02: Header Codec
// ============================================================================

fn bench_header_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-02-header-codec");
    let raw = header(10, &keys(7)[..5]).serialize();

    group.bench_function("deserialize_and_hash", |b| {
        b.iter(|| {
            let h = Header::deserialize(black_box(&raw)).unwrap();
            black_box(h.hash())
        })
    });

    group.finish();
}

// ============================================================================
// QC-13: Header Sync
// ============================================================================

fn bench_header_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-13-header-sync");
    group.measurement_time(Duration::from_secs(10));

    for n in [4u8, 7, 10] {
        let set = keys(n);
        let trusted = peers(&set);
        let required = (2 * n as usize) / 3 + 1;
        let raw = header(10, &set[..required]).serialize();

        group.bench_with_input(BenchmarkId::new("verify_header", n), &raw, |b, raw| {
            b.iter(|| {
                // Fresh decode so the memoized hash is not reused.
                let h = Header::deserialize(raw).unwrap();
                black_box(verify_header(&h, &trusted).is_ok())
            })
        });
    }

    let set = keys(7);
    let trusted = peers(&set);
    for size in [16usize, 64] {
        let raws: Vec<Vec<u8>> = (1..=size as u32)
            .map(|h| header(h, &set[..5]).serialize())
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        for parallel in [false, true] {
            let label = if parallel { "batch_parallel" } else { "batch_sequential" };
            group.bench_with_input(BenchmarkId::new(label, size), &raws, |b, raws| {
                b.iter(|| {
                    let headers: Vec<Header> =
                        raws.iter().map(|r| Header::deserialize(r).unwrap()).collect();
                    let jobs: Vec<_> = headers.iter().map(|h| (h, &trusted)).collect();
                    black_box(verify_batch(&jobs, parallel).is_ok())
                })
            });
        }
    }

    group.finish();
}

// ============================================================================
// QC-04: Trie Proof
// ============================================================================

fn bench_proof_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-04-trie-proof");

    for size in [16u64, 1024] {
        let mut trie = ProofTrie::new();
        for seq in 0..size {
            let mut key = b"request".to_vec();
            key.extend_from_slice(&seq.to_le_bytes());
            trie.insert(&key, vec![0xAB; 64]);
        }
        let root = trie.root_hash();
        let mut key = b"request".to_vec();
        key.extend_from_slice(&(size / 2).to_le_bytes());
        let proof = trie.prove(&key);

        group.bench_with_input(BenchmarkId::new("verify_proof", size), &proof, |b, proof| {
            b.iter(|| black_box(verify_proof(&root, &key, proof).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_header_codec,
    bench_header_verification,
    bench_proof_verification,
);

criterion_main!(benches);
