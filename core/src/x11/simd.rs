// SIMD-512 (version 1.1). Message expansion is a number-theoretic transform over
// GF(257); the compression runs four rounds of eight steps on four 256-bit rows.

use super::u32_le;

const IV: [u32; 32] = [
    0x0ba16b95, 0x72f999ad, 0x9fecc2ae, 0xba3264fc,
    0x5e894929, 0x8e9f30e5, 0x2f1daa37, 0xf0f2c558,
    0xac506643, 0xa90635a5, 0xe25b878b, 0xaab7878f,
    0x88817f7a, 0x0a02892b, 0x559a7550, 0x598f657e,
    0x7eef60a1, 0x6b70e3e8, 0x9c1714d1, 0xb958e2a8,
    0xab02675e, 0xed1c014f, 0xcd8d65bb, 0xfdb7a257,
    0x09254899, 0xd699c7bc, 0x9019b6dc, 0x2b9022e4,
    0x8fa14956, 0x21bf9bd3, 0xb94d0943, 0x6ffddc22,
];

const ALPHA: u32 = 41;

const fn powers_of_alpha() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut value = 1;
    let mut i = 0;
    while i < 256 {
        table[i] = value;
        value = value * ALPHA % 257;
        i += 1;
    }
    table
}

const POW: [u32; 256] = powers_of_alpha();

// Order in which the transformed message feeds the 32 steps.
const WORD_ORDER: [usize; 32] = [
    4, 6, 0, 2, 7, 5, 3, 1, 15, 11, 12, 8, 9, 13, 10, 14, 17, 18, 23, 20, 22, 21, 16, 19, 30,
    24, 25, 31, 27, 29, 28, 26,
];

const PERMUTATIONS: [usize; 11] = [1, 6, 2, 3, 5, 7, 4, 1, 6, 2, 3];

const ROTATIONS: [[u32; 4]; 4] = [[3, 23, 17, 27], [28, 19, 22, 7], [29, 9, 15, 5], [4, 13, 10, 25]];

type Row = [u32; 8];

fn if_function(x: u32, y: u32, z: u32) -> u32 {
    ((y ^ z) & x) ^ z
}

fn majority(x: u32, y: u32, z: u32) -> u32 {
    (x & y) | ((x | y) & z)
}

fn expand(block: &[u8], last: bool) -> [Row; 32] {
    let mut y = [0i32; 256];
    for (i, out) in y.iter_mut().enumerate() {
        let mut sum = 0u32;
        for (j, &byte) in block.iter().enumerate() {
            sum += byte as u32 * POW[(i * j) % 256];
        }
        // Tweak that keeps the final block's expansion distinct.
        sum += POW[(i * 255) % 256];
        if last {
            sum += POW[(i * 253) % 256];
        }
        let value = (sum % 257) as i32;
        *out = if value <= 128 { value } else { value - 257 };
    }

    let mut words = [[0u32; 8]; 32];
    for (step, row) in words.iter_mut().enumerate() {
        let source = WORD_ORDER[step] as isize;
        let (low, high, factor) = match step / 8 {
            0 | 1 => (0, 1, 185),
            2 => (-256, -128, 233),
            _ => (-383, -255, 233),
        };
        for (j, word) in row.iter_mut().enumerate() {
            let base = 16 * source + 2 * j as isize;
            let l = y[(base + low) as usize] * factor;
            let h = y[(base + high) as usize] * factor;
            *word = ((l as u32) & 0xffff).wrapping_add((h as u32) << 16);
        }
    }
    words
}

type Function = fn(u32, u32, u32) -> u32;

fn step(state: &mut [Row; 4], w: &Row, function: Function, r: u32, s: u32, p: usize) {
    let [a, b, c, d] = *state;
    let mut rotated = [0u32; 8];
    for n in 0..8 {
        rotated[n] = a[n].rotate_left(r);
    }
    for n in 0..8 {
        let tt = d[n]
            .wrapping_add(w[n])
            .wrapping_add(function(a[n], b[n], c[n]));
        state[0][n] = tt.rotate_left(s).wrapping_add(rotated[n ^ p]);
        state[1][n] = rotated[n];
        state[2][n] = b[n];
        state[3][n] = c[n];
    }
}

fn compress(state: &mut [u32; 32], block: &[u8], last: bool) {
    let w = expand(block, last);

    let mut rows = [[0u32; 8]; 4];
    for (i, chunk) in block.chunks_exact(4).enumerate() {
        rows[i / 8][i % 8] = state[i] ^ u32_le(chunk);
    }

    for round in 0..4 {
        let rot = ROTATIONS[round];
        for k in 0..8 {
            let function: Function = if k < 4 { if_function } else { majority };
            step(
                &mut rows,
                &w[8 * round + k],
                function,
                rot[k % 4],
                rot[(k + 1) % 4],
                PERMUTATIONS[k + round],
            );
        }
    }

    let mut old = [[0u32; 8]; 4];
    for (i, word) in state.iter().enumerate() {
        old[i / 8][i % 8] = *word;
    }
    step(&mut rows, &old[0], if_function, 4, 13, PERMUTATIONS[4]);
    step(&mut rows, &old[1], if_function, 13, 10, PERMUTATIONS[5]);
    step(&mut rows, &old[2], if_function, 10, 25, PERMUTATIONS[6]);
    step(&mut rows, &old[3], if_function, 25, 4, PERMUTATIONS[0]);

    for (i, word) in state.iter_mut().enumerate() {
        *word = rows[i / 8][i % 8];
    }
}

pub fn simd512(input: &[u8]) -> [u8; 64] {
    let mut state = IV;
    let mut blocks = input.chunks_exact(128);
    for block in &mut blocks {
        compress(&mut state, block, false);
    }

    let remainder = blocks.remainder();
    if !remainder.is_empty() {
        let mut padded = [0u8; 128];
        padded[..remainder.len()].copy_from_slice(remainder);
        compress(&mut state, &padded, false);
    }

    let mut length = [0u8; 128];
    length[..8].copy_from_slice(&(input.len() as u64).wrapping_mul(8).to_le_bytes());
    compress(&mut state, &length, true);

    let mut out = [0u8; 64];
    for (chunk, word) in out.chunks_exact_mut(4).zip(state) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    out
}
