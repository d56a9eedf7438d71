// Blue Midnight Wish, 512-bit output

use super::u64_le;

const fn initial_state(base: u64) -> [u64; 16] {
    let mut state = [0u64; 16];
    let mut i = 0;
    while i < 16 {
        state[i] = base.wrapping_add((i as u64).wrapping_mul(0x0808080808080808));
        i += 1;
    }
    state
}

const IV: [u64; 16] = initial_state(0x8081828384858687);

const fn final_chain() -> [u64; 16] {
    let mut state = [0u64; 16];
    let mut i = 0;
    while i < 16 {
        state[i] = 0xaaaaaaaaaaaaaaa0 + i as u64;
        i += 1;
    }
    state
}

const FINAL: [u64; 16] = final_chain();

// Each W_j is x[first] followed by four signed terms.
const W: [(usize, [(bool, usize); 4]); 16] = [
    (5, [(false, 7), (true, 10), (true, 13), (true, 14)]),
    (6, [(false, 8), (true, 11), (true, 14), (false, 15)]),
    (0, [(true, 7), (true, 9), (false, 12), (true, 15)]),
    (0, [(false, 1), (true, 8), (false, 10), (true, 13)]),
    (1, [(true, 2), (true, 9), (false, 11), (false, 14)]),
    (3, [(false, 2), (true, 10), (false, 12), (true, 15)]),
    (4, [(false, 0), (false, 3), (false, 11), (true, 13)]),
    (1, [(false, 4), (false, 5), (false, 12), (false, 14)]),
    (2, [(false, 5), (false, 6), (true, 13), (false, 15)]),
    (0, [(false, 3), (true, 6), (false, 7), (true, 14)]),
    (8, [(false, 1), (false, 4), (false, 7), (true, 15)]),
    (8, [(false, 0), (false, 2), (false, 5), (true, 9)]),
    (1, [(true, 3), (false, 6), (false, 9), (true, 10)]),
    (2, [(true, 4), (true, 7), (true, 10), (true, 11)]),
    (3, [(false, 5), (true, 8), (false, 11), (false, 12)]),
    (12, [(false, 4), (false, 6), (false, 9), (true, 13)]),
];

const R: [u32; 7] = [5, 11, 27, 32, 37, 43, 53];

fn s0(x: u64) -> u64 {
    (x >> 1) ^ (x << 3) ^ x.rotate_left(4) ^ x.rotate_left(37)
}

fn s1(x: u64) -> u64 {
    (x >> 1) ^ (x << 2) ^ x.rotate_left(13) ^ x.rotate_left(43)
}

fn s2(x: u64) -> u64 {
    (x >> 2) ^ (x << 1) ^ x.rotate_left(19) ^ x.rotate_left(53)
}

fn s3(x: u64) -> u64 {
    (x >> 2) ^ (x << 2) ^ x.rotate_left(28) ^ x.rotate_left(59)
}

fn s4(x: u64) -> u64 {
    (x >> 1) ^ x
}

fn s5(x: u64) -> u64 {
    (x >> 2) ^ x
}

fn shift(x: u64, amount: i32) -> u64 {
    if amount >= 0 {
        x << amount
    } else {
        x >> -amount
    }
}

fn compress(m: &[u64; 16], h: &[u64; 16]) -> [u64; 16] {
    let mut x = [0u64; 16];
    for i in 0..16 {
        x[i] = m[i] ^ h[i];
    }

    let mut q = [0u64; 32];
    for (j, (first, terms)) in W.iter().enumerate() {
        let mut w = x[*first];
        for &(add, index) in terms {
            w = if add {
                w.wrapping_add(x[index])
            } else {
                w.wrapping_sub(x[index])
            };
        }
        let s = match j % 5 {
            0 => s0(w),
            1 => s1(w),
            2 => s2(w),
            3 => s3(w),
            _ => s4(w),
        };
        q[j] = s.wrapping_add(h[(j + 1) % 16]);
    }

    for j in 16..32 {
        let a = j - 16;
        let add_element = m[a]
            .rotate_left(a as u32 + 1)
            .wrapping_add(m[(a + 3) % 16].rotate_left(((a + 3) % 16) as u32 + 1))
            .wrapping_sub(m[(a + 10) % 16].rotate_left(((a + 10) % 16) as u32 + 1))
            .wrapping_add((j as u64).wrapping_mul(0x0555555555555555))
            ^ h[(a + 7) % 16];

        let mut sum = 0u64;
        if j < 18 {
            for k in 0..16 {
                let value = q[a + k];
                let term = match k % 4 {
                    0 => s1(value),
                    1 => s2(value),
                    2 => s3(value),
                    _ => s0(value),
                };
                sum = sum.wrapping_add(term);
            }
        } else {
            for k in 0..14 {
                let term = if k % 2 == 0 {
                    q[a + k]
                } else {
                    q[a + k].rotate_left(R[k / 2])
                };
                sum = sum.wrapping_add(term);
            }
            sum = sum
                .wrapping_add(s4(q[a + 14]))
                .wrapping_add(s5(q[a + 15]));
        }
        q[j] = sum.wrapping_add(add_element);
    }

    let xl = q[16..24].iter().fold(0u64, |acc, v| acc ^ v);
    let xh = q[24..32].iter().fold(xl, |acc, v| acc ^ v);

    const HIGH_SHIFTS: [(i32, i32); 8] = [
        (5, -5),
        (-7, 8),
        (-5, 5),
        (-1, 5),
        (-3, 0),
        (6, -6),
        (-4, 6),
        (-11, 2),
    ];
    const LOW_SHIFTS: [i32; 8] = [8, -6, 6, 4, -3, -4, -7, -2];
    const LOW_Q: [usize; 8] = [23, 16, 17, 18, 19, 20, 21, 22];

    let mut d = [0u64; 16];
    for i in 0..8 {
        let (a, b) = HIGH_SHIFTS[i];
        d[i] = (shift(xh, a) ^ shift(q[16 + i], b) ^ m[i])
            .wrapping_add(xl ^ q[24 + i] ^ q[i]);
    }
    for i in 8..16 {
        d[i] = d[(i - 4) % 8]
            .rotate_left(i as u32 + 1)
            .wrapping_add(xh ^ q[16 + i] ^ m[i])
            .wrapping_add(shift(xl, LOW_SHIFTS[i - 8]) ^ q[LOW_Q[i - 8]] ^ q[i]);
    }
    d
}

fn load_block(block: &[u8]) -> [u64; 16] {
    let mut words = [0u64; 16];
    for (word, chunk) in words.iter_mut().zip(block.chunks_exact(8)) {
        *word = u64_le(chunk);
    }
    words
}

pub fn bmw512(input: &[u8]) -> [u8; 64] {
    let mut h = IV;
    let mut blocks = input.chunks_exact(128);
    for block in &mut blocks {
        h = compress(&load_block(block), &h);
    }

    let mut buffer = blocks.remainder().to_vec();
    buffer.push(0x80);
    if buffer.len() > 120 {
        buffer.resize(128, 0);
        h = compress(&load_block(&buffer), &h);
        buffer.clear();
    }
    buffer.resize(120, 0);
    buffer.extend_from_slice(&(input.len() as u64).wrapping_mul(8).to_le_bytes());
    h = compress(&load_block(&buffer), &h);
    h = compress(&h, &FINAL);

    let mut out = [0u8; 64];
    for (chunk, word) in out.chunks_exact_mut(8).zip(&h[8..]) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    // 121 bytes leave no room for the length, so padding spills into a second block.
    #[test]
    fn test_length_spills_into_extra_block() {
        assert_eq!(
            bmw512(&[0u8; 121]),
            hex!("39b0d625427b17e8c120e8570e0653c2e971fb176b5e206294255d441521a5d930473a8b9c865c7bf8c2933544b29a36094e8d178c9bfb1e193a853eb31f61f1")
        );
    }
}
