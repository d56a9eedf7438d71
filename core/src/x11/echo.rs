// ECHO-512: sixteen 128-bit words, eight of chaining value and eight of message,
// mixed with two AES rounds per word and a column-wise MixColumns.

use super::aes::{mix_column, round};

type Word = [u8; 16];

const ROUNDS: usize = 10;

fn compress(v: &mut [Word; 8], block: &[u8], counter: u128) {
    let mut w = [[0u8; 16]; 16];
    w[..8].copy_from_slice(&v[..]);
    for (word, chunk) in w[8..].iter_mut().zip(block.chunks_exact(16)) {
        word.copy_from_slice(chunk);
    }

    let mut k = counter;
    for _ in 0..ROUNDS {
        for word in w.iter_mut() {
            *word = round(&round(word, &k.to_le_bytes()), &[0u8; 16]);
            k = k.wrapping_add(1);
        }

        let mut shifted = [[0u8; 16]; 16];
        for column in 0..4 {
            for row in 0..4 {
                shifted[4 * column + row] = w[4 * ((column + row) % 4) + row];
            }
        }

        for column in 0..4 {
            for n in 0..16 {
                let mixed = mix_column([
                    shifted[4 * column][n],
                    shifted[4 * column + 1][n],
                    shifted[4 * column + 2][n],
                    shifted[4 * column + 3][n],
                ]);
                for row in 0..4 {
                    w[4 * column + row][n] = mixed[row];
                }
            }
        }
    }

    for i in 0..8 {
        for n in 0..16 {
            v[i][n] ^= block[16 * i + n] ^ w[i][n] ^ w[i + 8][n];
        }
    }
}

pub fn echo512(input: &[u8]) -> [u8; 64] {
    let mut v = [[0u8; 16]; 8];
    for word in v.iter_mut() {
        *word = 512u128.to_le_bytes();
    }

    let mut count: u128 = 0;
    let mut blocks = input.chunks_exact(128);
    for block in &mut blocks {
        count += 1024;
        compress(&mut v, block, count);
    }

    let remainder = blocks.remainder();
    let total = count + 8 * remainder.len() as u128;
    let mut buffer = [0u8; 128];
    buffer[..remainder.len()].copy_from_slice(remainder);
    buffer[remainder.len()] = 0x80;

    // A block carrying no message bits is compressed with a zero counter.
    let mut counter = if remainder.is_empty() { 0 } else { total };
    if remainder.len() >= 110 {
        compress(&mut v, &buffer, counter);
        buffer = [0u8; 128];
        counter = 0;
    }
    buffer[110..112].copy_from_slice(&512u16.to_le_bytes());
    buffer[112..128].copy_from_slice(&total.to_le_bytes());
    compress(&mut v, &buffer, counter);

    let mut out = [0u8; 64];
    for (chunk, word) in out.chunks_exact_mut(16).zip(&v[..4]) {
        chunk.copy_from_slice(word);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_message_filling_the_padding_area() {
        assert_eq!(
            echo512(&[0u8; 111]),
            hex!("4b2099d77ed3cad348554a98db95b012c281151bd0ba6bec99d19b818a0597fa221572aad04a9360600b659bd40a07ed2ee23adf2896a0561fcfc9af32b1016a")
        );
    }

    #[test]
    fn test_exact_block_message() {
        assert_eq!(
            echo512(&[0u8; 128]),
            hex!("8ac158f1894bd37207637ed60058f725237f5a6638078ad7cf30af8c4166dbec73ee44bad84187413b62f0c98807304db29f99e68b305a6341c0304f67ea904c")
        );
    }
}
