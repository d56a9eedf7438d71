// SHAvite-3-512: a 14-round Feistel-like construction over four 128-bit branches,
// each round built from keyless AES rounds.

use super::aes::round_words;
use super::u32_le;

type Word128 = [u32; 4];

const IV: [u32; 16] = [
    0x72fccdd8, 0x79ca4727, 0x128a077b, 0x40d55aec,
    0xd1901a06, 0x430ae307, 0xb29f5cd1, 0xdf07fbfc,
    0x8e45d73d, 0x681ab538, 0xbde86578, 0xdd577e47,
    0xe275eade, 0x502d9fcd, 0xb9357178, 0x022a4b9a,
];

const ROUNDS: usize = 14;

// (source, target) branch for each half of a round, by round mod 4.
const ROUTES: [[(usize, usize); 2]; 4] = [
    [(1, 0), (3, 2)],
    [(0, 3), (2, 1)],
    [(3, 2), (1, 0)],
    [(2, 1), (0, 3)],
];

fn xor(a: Word128, b: &[u32]) -> Word128 {
    [a[0] ^ b[0], a[1] ^ b[1], a[2] ^ b[2], a[3] ^ b[3]]
}

/// Where the counter is mixed into the key schedule: (round, group, words).
fn counter_injection(round: usize, group: usize, c: &[u32; 4]) -> Option<Word128> {
    match (round, group) {
        (1, 0) => Some([c[0], c[1], c[2], !c[3]]),
        (5, 1) => Some([c[3], c[2], c[1], !c[0]]),
        (9, 7) => Some([c[2], c[3], c[0], !c[1]]),
        (13, 6) => Some([c[1], c[0], c[3], !c[2]]),
        _ => None,
    }
}

fn compress(h: &mut [u32; 16], block: &[u8], counter: u128) {
    let c = [
        counter as u32,
        (counter >> 32) as u32,
        (counter >> 64) as u32,
        (counter >> 96) as u32,
    ];

    let mut p = [[0u32; 4]; 4];
    for (branch, words) in p.iter_mut().zip(h.chunks_exact(4)) {
        branch.copy_from_slice(words);
    }
    let mut rk = [0u32; 32];
    for (word, chunk) in rk.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32_le(chunk);
    }

    for round in 0..ROUNDS {
        if round % 2 == 1 {
            // Nonlinear expansion, one 128-bit group at a time.
            for group in 0..8 {
                let base = 4 * group;
                let expanded =
                    round_words([rk[base + 1], rk[base + 2], rk[base + 3], rk[base]]);
                for i in 0..4 {
                    rk[base + i] = expanded[i] ^ rk[(base + 28 + i) % 32];
                }
                if let Some(injected) = counter_injection(round, group, &c) {
                    for i in 0..4 {
                        rk[base + i] ^= injected[i];
                    }
                }
            }
        } else if round > 0 {
            // Linear expansion, updated in place.
            for i in 0..32 {
                rk[i] ^= rk[(i + 25) % 32];
            }
        }

        for (half, &(source, target)) in ROUTES[round % 4].iter().enumerate() {
            let mut x = p[source];
            for group in 0..4 {
                let start = 16 * half + 4 * group;
                x = round_words(xor(x, &rk[start..start + 4]));
            }
            p[target] = xor(p[target], &x);
        }
    }

    for (i, branch) in [p[2], p[3], p[0], p[1]].iter().enumerate() {
        for j in 0..4 {
            h[4 * i + j] ^= branch[j];
        }
    }
}

pub fn shavite512(input: &[u8]) -> [u8; 64] {
    let mut h = IV;
    let mut count: u128 = 0;
    let mut blocks = input.chunks_exact(128);
    for block in &mut blocks {
        count += 1024;
        compress(&mut h, block, count);
    }

    let remainder = blocks.remainder();
    let total = count + 8 * remainder.len() as u128;
    let mut buffer = [0u8; 128];
    buffer[..remainder.len()].copy_from_slice(remainder);
    buffer[remainder.len()] = 0x80;

    // A block carrying no message bits is compressed with a zero counter.
    let mut counter = if remainder.is_empty() { 0 } else { total };
    if remainder.len() >= 110 {
        compress(&mut h, &buffer, counter);
        buffer = [0u8; 128];
        counter = 0;
    }
    buffer[110..126].copy_from_slice(&total.to_le_bytes());
    buffer[126..128].copy_from_slice(&512u16.to_le_bytes());
    compress(&mut h, &buffer, counter);

    let mut out = [0u8; 64];
    for (chunk, word) in out.chunks_exact_mut(4).zip(h) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    out
}
