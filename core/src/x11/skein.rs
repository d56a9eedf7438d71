// Skein-512-512 (version 1.3) built from Threefish-512 in UBI chaining mode.

use super::u64_le;

const KEY_PARITY: u64 = 0x1bd11bdaa9fc1a22;

const ROTATIONS: [[u32; 4]; 8] = [
    [46, 36, 19, 37],
    [33, 27, 14, 42],
    [17, 49, 36, 39],
    [44, 9, 54, 56],
    [39, 30, 34, 24],
    [13, 50, 10, 17],
    [25, 29, 39, 43],
    [8, 35, 56, 22],
];

const PERMUTATION: [usize; 8] = [2, 1, 4, 7, 6, 5, 0, 3];

const TYPE_CONFIG: u64 = 4;
const TYPE_MESSAGE: u64 = 48;
const TYPE_OUTPUT: u64 = 63;

fn threefish(key: &[u64; 8], tweak: [u64; 2], plaintext: &[u64; 8]) -> [u64; 8] {
    let mut k = [0u64; 9];
    k[..8].copy_from_slice(key);
    k[8] = key.iter().fold(KEY_PARITY, |acc, word| acc ^ word);
    let t = [tweak[0], tweak[1], tweak[0] ^ tweak[1]];

    let subkey = |s: usize| -> [u64; 8] {
        let mut ks = [0u64; 8];
        for (i, word) in ks.iter_mut().enumerate() {
            *word = k[(s + i) % 9];
        }
        ks[5] = ks[5].wrapping_add(t[s % 3]);
        ks[6] = ks[6].wrapping_add(t[(s + 1) % 3]);
        ks[7] = ks[7].wrapping_add(s as u64);
        ks
    };

    let mut v = *plaintext;
    for d in 0..72 {
        if d % 4 == 0 {
            let ks = subkey(d / 4);
            for (word, key_word) in v.iter_mut().zip(ks) {
                *word = word.wrapping_add(key_word);
            }
        }
        let mut f = [0u64; 8];
        for j in 0..4 {
            let a = v[2 * j].wrapping_add(v[2 * j + 1]);
            f[2 * j] = a;
            f[2 * j + 1] = v[2 * j + 1].rotate_left(ROTATIONS[d % 8][j]) ^ a;
        }
        for (i, word) in v.iter_mut().enumerate() {
            *word = f[PERMUTATION[i]];
        }
    }

    let ks = subkey(18);
    for (word, key_word) in v.iter_mut().zip(ks) {
        *word = word.wrapping_add(key_word);
    }
    v
}

/// Unique Block Iteration of `message` under the chaining value `g`.
fn ubi(mut g: [u64; 8], message: &[u8], block_type: u64) -> [u64; 8] {
    let mut data = message.to_vec();
    if data.is_empty() {
        data.resize(64, 0);
    }
    while data.len() % 64 != 0 {
        data.push(0);
    }

    let count = data.len() / 64;
    for (index, block) in data.chunks_exact(64).enumerate() {
        let position = message.len().min(64 * (index + 1)) as u64;
        let mut flags = block_type << 56;
        if index == 0 {
            flags |= 1 << 62;
        }
        if index == count - 1 {
            flags |= 1 << 63;
        }

        let mut words = [0u64; 8];
        for (word, chunk) in words.iter_mut().zip(block.chunks_exact(8)) {
            *word = u64_le(chunk);
        }
        let encrypted = threefish(&g, [position, flags], &words);
        for i in 0..8 {
            g[i] = encrypted[i] ^ words[i];
        }
    }
    g
}

pub fn skein512(input: &[u8]) -> [u8; 64] {
    let mut config = [0u8; 32];
    config[..4].copy_from_slice(b"SHA3");
    config[4..6].copy_from_slice(&1u16.to_le_bytes());
    config[8..16].copy_from_slice(&512u64.to_le_bytes());

    let g = ubi([0u64; 8], &config, TYPE_CONFIG);
    let g = ubi(g, input, TYPE_MESSAGE);
    let g = ubi(g, &[0u8; 8], TYPE_OUTPUT);

    let mut out = [0u8; 64];
    for (chunk, word) in out.chunks_exact_mut(8).zip(g) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    out
}
