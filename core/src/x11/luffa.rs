// Luffa-512: five 256-bit lanes, 32-byte message blocks.

use super::u32_be;

type Lane = [u32; 8];

const IV: [Lane; 5] = [
    [0x6d251e69, 0x44b051e0, 0x4eaa6fb4, 0xdbf78465, 0x6e292011, 0x90152df4, 0xee058139, 0xdef610bb],
    [0xc3b44b95, 0xd9d2f256, 0x70eee9a0, 0xde099fa3, 0x5d9b0557, 0x8fc944b3, 0xcf1ccf0e, 0x746cd581],
    [0xf7efc89d, 0x5dba5781, 0x04016ce5, 0xad659c05, 0x0306194f, 0x666d1836, 0x24aa230a, 0x8b264ae7],
    [0x858075d5, 0x36d79cce, 0xe571f7d7, 0x204b1f67, 0x35870c6a, 0x57e9e923, 0x14bcb808, 0x7cde72ce],
    [0x6c68e9be, 0x5ec41e22, 0xc825b7c7, 0xaffb4363, 0xf5df3999, 0x0fc688f1, 0xb07224cc, 0x03e86cea],
];

const RC0: [[u32; 8]; 5] = [
    [0x303994a6, 0xc0e65299, 0x6cc33a12, 0xdc56983e, 0x1e00108f, 0x7800423d, 0x8f5b7882, 0x96e1db12],
    [0xb6de10ed, 0x70f47aae, 0x0707a3d4, 0x1c1e8f51, 0x707a3d45, 0xaeb28562, 0xbaca1589, 0x40a46f3e],
    [0xfc20d9d2, 0x34552e25, 0x7ad8818f, 0x8438764a, 0xbb6de032, 0xedb780c8, 0xd9847356, 0xa2c78434],
    [0xb213afa5, 0xc84ebe95, 0x4e608a22, 0x56d858fe, 0x343b138f, 0xd0ec4e3d, 0x2ceb4882, 0xb3ad2208],
    [0xf0d2e9e3, 0xac11d7fa, 0x1bcb66f2, 0x6f2d9bc9, 0x78602649, 0x8edae952, 0x3b6ba548, 0xedae9520],
];

const RC4: [[u32; 8]; 5] = [
    [0xe0337818, 0x441ba90d, 0x7f34d442, 0x9389217f, 0xe5a8bce6, 0x5274baf4, 0x26889ba7, 0x9a226e9d],
    [0x01685f3d, 0x05a17cf4, 0xbd09caca, 0xf4272b28, 0x144ae5cc, 0xfaa7ae2b, 0x2e48f1c1, 0xb923c704],
    [0xe25e72c1, 0xe623bb72, 0x5c58a4a4, 0x1e38e2e7, 0x78e38b9d, 0x27586719, 0x36eda57f, 0x703aace7],
    [0xe028c9bf, 0x44756f91, 0x7e8fce32, 0x956548be, 0xfe191be2, 0x3cb226e5, 0x5944a28e, 0xa1c4c355],
    [0x5090d577, 0x2d1925ab, 0xb46496ac, 0xd1925ab0, 0x29131ab6, 0x0fc053c3, 0x3f014f0c, 0xfc053c31],
];

/// Multiplication by 2 in the ring used by the message injection.
fn times_two(s: Lane) -> Lane {
    let t = s[7];
    [t, s[0] ^ t, s[1], s[2] ^ t, s[3] ^ t, s[4], s[5], s[6]]
}

fn xor(a: Lane, b: Lane) -> Lane {
    let mut out = a;
    for (word, other) in out.iter_mut().zip(b) {
        *word ^= other;
    }
    out
}

fn message_injection(v: &mut [Lane; 5], block: &[u8]) {
    let mut m = [0u32; 8];
    for (word, chunk) in m.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32_be(chunk);
    }

    let a = times_two(v.iter().fold([0u32; 8], |acc, lane| xor(acc, *lane)));
    for lane in v.iter_mut() {
        *lane = xor(*lane, a);
    }

    let b = xor(times_two(v[0]), v[1]);
    v[1] = xor(times_two(v[1]), v[2]);
    v[2] = xor(times_two(v[2]), v[3]);
    v[3] = xor(times_two(v[3]), v[4]);
    v[4] = xor(times_two(v[4]), v[0]);

    v[0] = xor(times_two(b), v[4]);
    v[4] = xor(times_two(v[4]), v[3]);
    v[3] = xor(times_two(v[3]), v[2]);
    v[2] = xor(times_two(v[2]), v[1]);
    v[1] = xor(times_two(v[1]), b);

    for lane in v.iter_mut() {
        *lane = xor(*lane, m);
        m = times_two(m);
    }
}

fn sub_crumb(a: &mut Lane, i0: usize, i1: usize, i2: usize, i3: usize) {
    let (mut a0, mut a1, mut a2, mut a3) = (a[i0], a[i1], a[i2], a[i3]);
    let mut t = a0;
    a0 |= a1;
    a2 ^= a3;
    a1 = !a1;
    a0 ^= a3;
    a3 &= t;
    a1 ^= a3;
    a3 ^= a2;
    a2 &= a0;
    a0 = !a0;
    a2 ^= a1;
    a1 |= a3;
    t ^= a1;
    a3 ^= a2;
    a2 &= a1;
    a1 ^= a0;
    a0 = t;
    a[i0] = a0;
    a[i1] = a1;
    a[i2] = a2;
    a[i3] = a3;
}

fn mix_word(a: &mut Lane, i: usize, j: usize) {
    let (mut u, mut v) = (a[i], a[j]);
    v ^= u;
    u = u.rotate_left(2) ^ v;
    v = v.rotate_left(14) ^ u;
    u = u.rotate_left(10) ^ v;
    v = v.rotate_left(1);
    a[i] = u;
    a[j] = v;
}

fn permute(v: &mut [Lane; 5]) {
    for (j, lane) in v.iter_mut().enumerate().skip(1) {
        for word in &mut lane[4..] {
            *word = word.rotate_left(j as u32);
        }
    }
    for (j, lane) in v.iter_mut().enumerate() {
        for r in 0..8 {
            sub_crumb(lane, 0, 1, 2, 3);
            sub_crumb(lane, 5, 6, 7, 4);
            for k in 0..4 {
                mix_word(lane, k, k + 4);
            }
            lane[0] ^= RC0[j][r];
            lane[4] ^= RC4[j][r];
        }
    }
}

pub fn luffa512(input: &[u8]) -> [u8; 64] {
    let mut v = IV;
    let mut blocks = input.chunks_exact(32);
    for block in &mut blocks {
        message_injection(&mut v, block);
        permute(&mut v);
    }

    let mut buffer = [0u8; 32];
    let remainder = blocks.remainder();
    buffer[..remainder.len()].copy_from_slice(remainder);
    buffer[remainder.len()] = 0x80;

    // One round absorbs the padded block, then two blank rounds squeeze 256 bits each.
    let mut out = [0u8; 64];
    for round in 0..3 {
        message_injection(&mut v, &buffer);
        permute(&mut v);
        if round == 0 {
            buffer = [0u8; 32];
            continue;
        }
        let folded = v.iter().fold([0u32; 8], |acc, lane| xor(acc, *lane));
        let half = &mut out[32 * (round - 1)..32 * round];
        for (chunk, word) in half.chunks_exact_mut(4).zip(folded) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_block_aligned_message() {
        assert_eq!(
            luffa512(&[0u8; 64]),
            hex!("2ee74681f3a31e89c4a67ee6adceab4f82d8c0f9ed18b345d2f0ef6f55111ba0399eea4fccd0834fd61c70cfe9088ed84e09bec1d64c993ae064351c8740d2bf")
        );
    }
}
