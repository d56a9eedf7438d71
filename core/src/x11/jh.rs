// JH-512 (round-3 version, 42 rounds of E8). The state is handled as 256 four-bit
// elements.

const SBOXES: [[u8; 16]; 2] = [
    [9, 0, 4, 11, 13, 12, 3, 15, 1, 10, 2, 6, 7, 5, 8, 14],
    [3, 12, 6, 13, 5, 7, 1, 9, 15, 2, 0, 4, 11, 10, 14, 8],
];

const ROUNDS: usize = 42;

// Leading nibbles of the first round constant.
const C0: [u8; 32] = [
    0x6a, 0x09, 0xe6, 0x67, 0xf3, 0xbc, 0xc9, 0x08, 0xb2, 0xfb, 0x13, 0x66, 0xea, 0x95, 0x7d, 0x3e,
    0x3a, 0xde, 0xc1, 0x75, 0x12, 0x77, 0x50, 0x99, 0xda, 0x2f, 0x59, 0x0b, 0x06, 0x67, 0x32, 0x2a,
];

/// The MDS-style linear transformation on a pair of elements.
fn linear(a: u8, b: u8) -> (u8, u8) {
    let b = b ^ (((a << 1) ^ (a >> 3) ^ ((a >> 2) & 2)) & 0xf);
    let a = a ^ (((b << 1) ^ (b >> 3) ^ ((b >> 2) & 2)) & 0xf);
    (a, b)
}

/// The permutation P_d applied to a slice of 2^d elements.
fn permute(elements: &mut [u8]) {
    let n = elements.len();
    let half = n / 2;

    for i in (0..n).step_by(4) {
        elements.swap(i + 2, i + 3);
    }
    let mut out = vec![0u8; n];
    for i in 0..half {
        out[i] = elements[2 * i];
        out[i + half] = elements[2 * i + 1];
    }
    for i in (half..n).step_by(2) {
        out.swap(i, i + 1);
    }
    elements.copy_from_slice(&out);
}

fn next_constant(constant: &mut [u8; 64]) {
    for nibble in constant.iter_mut() {
        *nibble = SBOXES[0][*nibble as usize];
    }
    for i in (0..64).step_by(2) {
        let (a, b) = linear(constant[i], constant[i + 1]);
        constant[i] = a;
        constant[i + 1] = b;
    }
    permute(constant);
}

fn e8(h: &mut [u8; 128]) {
    // Grouping: element i gathers bit i of each 256-bit quarter.
    let mut grouped = [0u8; 256];
    for (i, element) in grouped.iter_mut().enumerate() {
        for k in 0..4 {
            let bit = (h[(i + 256 * k) >> 3] >> (7 - (i & 7))) & 1;
            *element |= bit << (3 - k);
        }
    }
    let mut a = [0u8; 256];
    for i in 0..128 {
        a[2 * i] = grouped[i];
        a[2 * i + 1] = grouped[i + 128];
    }

    let mut constant = [0u8; 64];
    for (i, nibble) in constant.iter_mut().enumerate() {
        *nibble = (C0[i >> 1] >> (4 * (1 - (i & 1)))) & 0xf;
    }

    for _ in 0..ROUNDS {
        for (i, element) in a.iter_mut().enumerate() {
            let select = (constant[i >> 2] >> (3 - (i & 3))) & 1;
            *element = SBOXES[select as usize][*element as usize];
        }
        for i in (0..256).step_by(2) {
            let (x, y) = linear(a[i], a[i + 1]);
            a[i] = x;
            a[i + 1] = y;
        }
        permute(&mut a);
        next_constant(&mut constant);
    }

    for i in 0..128 {
        grouped[i] = a[2 * i];
        grouped[i + 128] = a[2 * i + 1];
    }
    *h = [0u8; 128];
    for (i, element) in grouped.iter().enumerate() {
        for k in 0..4 {
            h[(i + 256 * k) >> 3] |= ((element >> (3 - k)) & 1) << (7 - (i & 7));
        }
    }
}

fn f8(h: &mut [u8; 128], block: &[u8]) {
    for (byte, m) in h[..64].iter_mut().zip(block) {
        *byte ^= m;
    }
    e8(h);
    for (byte, m) in h[64..].iter_mut().zip(block) {
        *byte ^= m;
    }
}

pub fn jh512(input: &[u8]) -> [u8; 64] {
    let mut h = [0u8; 128];
    h[..2].copy_from_slice(&512u16.to_be_bytes());
    f8(&mut h, &[0u8; 64]);

    let bits = input.len() as u128 * 8;
    let mut data = input.to_vec();
    data.push(0x80);
    if input.len() % 64 == 0 {
        data.resize(data.len() + 47, 0);
    } else {
        while data.len() % 64 != 0 {
            data.push(0);
        }
        data.resize(data.len() + 48, 0);
    }
    data.extend_from_slice(&bits.to_be_bytes());

    for block in data.chunks_exact(64) {
        f8(&mut h, block);
    }

    let mut out = [0u8; 64];
    out.copy_from_slice(&h[64..]);
    out
}
