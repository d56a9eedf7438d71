// CubeHash16/32-512: 16 rounds per 32-byte block, 160 finalization rounds.

use super::u32_le;

const ROUNDS_PER_BLOCK: usize = 16;
const FINAL_ROUNDS: usize = 160;

// The state after the 160 initialization rounds for a 512-bit output.
const IV: [u32; 32] = [
    0x2aea2a61, 0x50f494d4, 0x2d538b8b, 0x4167d83e,
    0x3fee2313, 0xc701cf8c, 0xcc39968e, 0x50ac5695,
    0x4d42c787, 0xa647a8b3, 0x97cf0bef, 0x825b4537,
    0xeef864d2, 0xf22090c4, 0xd0e5cd33, 0xa23911ae,
    0xfcd398d9, 0x148fe485, 0x1b017bef, 0xb6444532,
    0x6a536159, 0x2ff5781c, 0x91fa7934, 0x0dbadea9,
    0xd65c8a2b, 0xa5a70e75, 0xb1c62456, 0xbc796576,
    0x1921c8f7, 0xe7989af1, 0x7795d246, 0xd43e3b44,
];

fn round(x: &mut [u32; 32]) {
    for i in 0..16 {
        x[i + 16] = x[i + 16].wrapping_add(x[i]);
        x[i] = x[i].rotate_left(7);
    }
    for i in 0..8 {
        x.swap(i, i + 8);
    }
    for i in 0..16 {
        x[i] ^= x[i + 16];
    }
    for i in (16..32).filter(|i| i & 2 == 0) {
        x.swap(i, i + 2);
    }
    for i in 0..16 {
        x[i + 16] = x[i + 16].wrapping_add(x[i]);
        x[i] = x[i].rotate_left(11);
    }
    for i in (0..16).filter(|i| i & 4 == 0) {
        x.swap(i, i + 4);
    }
    for i in 0..16 {
        x[i] ^= x[i + 16];
    }
    for i in (16..32).step_by(2) {
        x.swap(i, i + 1);
    }
}

pub fn cubehash512(input: &[u8]) -> [u8; 64] {
    let mut x = IV;
    let mut data = input.to_vec();
    data.push(0x80);
    while data.len() % 32 != 0 {
        data.push(0);
    }

    for block in data.chunks_exact(32) {
        for (word, chunk) in x.iter_mut().zip(block.chunks_exact(4)) {
            *word ^= u32_le(chunk);
        }
        for _ in 0..ROUNDS_PER_BLOCK {
            round(&mut x);
        }
    }

    x[31] ^= 1;
    for _ in 0..FINAL_ROUNDS {
        round(&mut x);
    }

    let mut out = [0u8; 64];
    for (chunk, word) in out.chunks_exact_mut(4).zip(x) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_from_parameters() {
        let mut x = [0u32; 32];
        x[0] = 64;
        x[1] = 32;
        x[2] = 16;
        for _ in 0..FINAL_ROUNDS {
            round(&mut x);
        }
        assert_eq!(x, IV);
    }
}
