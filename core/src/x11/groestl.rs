// Grøstl-512. The 1024-bit state is an 8 x 16 byte matrix stored column by
// column, so byte 8 * column + row.

use super::aes::{sbox, xtime};

const ROUNDS: u8 = 14;
const SHIFT_P: [usize; 8] = [0, 1, 2, 3, 4, 5, 6, 11];
const SHIFT_Q: [usize; 8] = [1, 3, 5, 11, 0, 2, 4, 6];
const MIX: [u8; 8] = [2, 2, 3, 4, 5, 3, 5, 7];

#[derive(Clone, Copy, PartialEq, Eq)]
enum Permutation {
    P,
    Q,
}

fn multiply(byte: u8, factor: u8) -> u8 {
    let double = xtime(byte);
    let quadruple = xtime(double);
    match factor {
        2 => double,
        3 => double ^ byte,
        4 => quadruple,
        5 => quadruple ^ byte,
        7 => quadruple ^ double ^ byte,
        _ => unreachable!("no such MixBytes coefficient"),
    }
}

fn permute(mut x: [u8; 128], which: Permutation) -> [u8; 128] {
    let shifts = match which {
        Permutation::P => &SHIFT_P,
        Permutation::Q => &SHIFT_Q,
    };

    for round in 0..ROUNDS {
        match which {
            Permutation::P => {
                for column in 0..16u8 {
                    x[8 * column as usize] ^= (column << 4) ^ round;
                }
            }
            Permutation::Q => {
                for byte in x.iter_mut() {
                    *byte ^= 0xff;
                }
                for column in 0..16u8 {
                    x[8 * column as usize + 7] ^= (column << 4) ^ round;
                }
            }
        }

        let mut shifted = [0u8; 128];
        for column in 0..16 {
            for row in 0..8 {
                shifted[8 * column + row] = sbox(x[8 * ((column + shifts[row]) % 16) + row]);
            }
        }

        for column in 0..16 {
            let source = &shifted[8 * column..8 * column + 8];
            for row in 0..8 {
                x[8 * column + row] = (0..8).fold(0, |acc, j| {
                    acc ^ multiply(source[j], MIX[(j + 8 - row) % 8])
                });
            }
        }
    }
    x
}

pub fn groestl512(input: &[u8]) -> [u8; 64] {
    let mut data = input.to_vec();
    data.push(0x80);
    while data.len() % 128 != 120 {
        data.push(0);
    }
    let blocks = (data.len() / 128 + 1) as u64;
    data.extend_from_slice(&blocks.to_be_bytes());

    let mut h = [0u8; 128];
    h[126] = 0x02;
    for chunk in data.chunks_exact(128) {
        let mut block = [0u8; 128];
        block.copy_from_slice(chunk);
        let mut mixed = h;
        for (byte, m) in mixed.iter_mut().zip(block) {
            *byte ^= m;
        }
        let p = permute(mixed, Permutation::P);
        let q = permute(block, Permutation::Q);
        for i in 0..128 {
            h[i] ^= p[i] ^ q[i];
        }
    }

    let p = permute(h, Permutation::P);
    let mut out = [0u8; 64];
    for i in 0..64 {
        out[i] = h[64 + i] ^ p[64 + i];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_exact_block_message() {
        assert_eq!(
            groestl512(&[0u8; 128]),
            hex!("ae1c559853772752b5bf71ec5e6acab938b879c24cfa3db26fb698b283f8681eec4d40e93ba55cb06519943d8c1cd07beec9de3784839d019af157e8832d2f9a")
        );
    }
}
