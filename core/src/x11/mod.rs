// X11 proof-of-work hash
// =====================
//
// Blocks are identified by X11: eleven 512-bit hash functions applied in sequence
// to the 80-byte header, each one hashing the 64-byte digest of the one before.
// The block hash is the first 32 bytes of the last digest. Keccak comes from the
// `sha3` crate; the other ten functions live in the submodules.

use sha3::{Digest, Keccak512};

mod aes;
pub mod blake;
pub mod bmw;
pub mod cubehash;
pub mod echo;
pub mod groestl;
pub mod jh;
pub mod luffa;
pub mod shavite;
pub mod simd;
pub mod skein;

pub fn keccak512(input: &[u8]) -> [u8; 64] {
    let mut out = [0u8; 64];
    out.copy_from_slice(&Keccak512::digest(input));
    out
}

/// The eleven stages in hashing order.
pub const CHAIN: [fn(&[u8]) -> [u8; 64]; 11] = [
    blake::blake512,
    bmw::bmw512,
    groestl::groestl512,
    skein::skein512,
    jh::jh512,
    keccak512,
    luffa::luffa512,
    cubehash::cubehash512,
    shavite::shavite512,
    simd::simd512,
    echo::echo512,
];

/// Returns the X11 hash of `input` in internal (little-endian) byte order.
pub fn x11(input: &[u8]) -> [u8; 32] {
    let mut digest = blake::blake512(input);
    for stage in &CHAIN[1..] {
        digest = stage(&digest[..]);
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest[..32]);
    out
}

pub(crate) fn u32_le(bytes: &[u8]) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(word)
}

pub(crate) fn u32_be(bytes: &[u8]) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[..4]);
    u32::from_be_bytes(word)
}

pub(crate) fn u64_le(bytes: &[u8]) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&bytes[..8]);
    u64::from_le_bytes(word)
}

pub(crate) fn u64_be(bytes: &[u8]) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&bytes[..8]);
    u64::from_be_bytes(word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    fn counting_bytes() -> Vec<u8> {
        (0..200u8).collect()
    }

    #[test]
    fn test_empty_input_digests() {
        let expected: [[u8; 64]; 11] = [
            hex!("a8cfbbd73726062df0c6864dda65defe58ef0cc52a5625090fa17601e1eecd1b628e94f396ae402a00acc9eab77b4d4c2e852aaaa25a636d80af3fc7913ef5b8"),
            hex!("6a725655c42bc8a2a20549dd5a233a6a2beb01616975851fd122504e604b46af7d96697d0b6333db1d1709d6df328d2a6c786551b0cce2255e8c7332b4819c0e"),
            hex!("6d3ad29d279110eef3adbd66de2a0345a77baede1557f5d099fce0c03d6dc2ba8e6d4a6633dfbd66053c20faa87d1a11f39a7fbe4a6c2f009801370308fc4ad8"),
            hex!("bc5b4c50925519c290cc634277ae3d6257212395cba733bbad37a4af0fa06af41fca7903d06564fea7a2d3730dbdb80c1f85562dfcc070334ea4d1d9e72cba7a"),
            hex!("90ecf2f76f9d2c8017d979ad5ab96b87d58fc8fc4b83060f3f900774faa2c8fabe69c5f4ff1ec2b61d6b316941cedee117fb04b1f4c5bc1b919ae841c50eec4f"),
            hex!("0eab42de4c3ceb9235fc91acffe746b29c29a8c366b7c60e4e67c466f36a4304c00fa9caf9d87976ba469bcbe06713b435f091ef2769fb160cdab33d3670680e"),
            hex!("6e7de4501189b3ca58f3ac114916654bbcd4922024b4cc1cd764acfe8ab4b7805df133eab345ffdb1c414564c924f48e0a301824e2ac4c34bd4efde2e43da90e"),
            hex!("4a1d00bbcfcb5a9562fb981e7f7db3350fe2658639d948b9d57452c22328bb32f468b072208450bad5ee178271408be0b16e5633ac8a1e3cf9864cfbfc8e043a"),
            hex!("a485c1b2578459d1efc5dddd840bb0b4a650ac82fe68f58c4442ccda747da006b2d1dc6b4a4eb7d84ff91e1f466fef429d259acd995dddcad16fa545c7a6e5ba"),
            hex!("51a5af7e243cd9a5989f7792c880c4c3168c3d60c4518725fe5757d1f7a69c6366977eaba7905ce2da5d7cfd07773725f0935b55f3efb954996689a49b6d29e0"),
            hex!("158f58cc79d300a9aa292515049275d051a28ab931726d0ec44bdd9faef4a702c36db9e7922fff077402236465833c5cc76af4efc352b4b44c7fa15aa0ef234e"),
        ];
        let empty: &[u8] = &[];
        for (stage, digest) in CHAIN.iter().zip(expected) {
            assert_eq!(stage(empty), digest);
        }
    }

    // 200 bytes spans more than one block for every function and leaves a
    // partial final block.
    #[test]
    fn test_multi_block_digests() {
        let input = counting_bytes();
        let expected: [[u8; 64]; 11] = [
            hex!("e327afcd4b6113e8f9571f030f60b4b85ea29df58c35ac1d0daceefe9edb17c6ce5a8bf5934214da6a3746f72c8b96cfce9625f4edf157408d67a6d3071d5980"),
            hex!("7e20227e3ba9b5545954122c38981ba2005d869fa6fc24f8ae200c54c0873c753755469a5477868c0e63ddd8319128947d3e8c31ad06dfa2381c7bc98442fca0"),
            hex!("ff6dabc4aacd1f3955daba7ee2f36b2e24cca8aef87bdf286ea77b2d86dc40526ca5290c0558e95b4f620d78241a2665ab300216016b66ae87c6dc2e216348bb"),
            hex!("59d7f27c018c72b4d2de9b0bdfb87956aa5ec81c0d5be095f8446c598fa31f3ed74ab66a948cce35cf7831748eb48042b60d09a97d7124dc025b2de166ffb80d"),
            hex!("f887f615cf46099a0582a23e7dd8cb5110de8d0056840d20bf38bde116defd27faba3bf6d4df1cf34acef5df1b660a393e836f960e8dc88c604704b031428465"),
            hex!("f452d81b62b961f8023f8228cbe780379b36c49ddcef29e0dffb01a930c2cc53a694ed6ae3f0d224a2f1be55814a81841b90d56bcdf4a48a633f258a32dc14fc"),
            hex!("bef9b87ff7e6d2a671dc0d26fd3682c960e619c92867e20d0aacaee5dbe4a40445f36831e42640162d71edbc7b5970186773b3d83f30f4c037981406fcf18a7f"),
            hex!("2408d7da8c62c98f59bb17a54cb2431c7f43f1565babcd226425f5d117f0b339833618ccfaec95371870e6322a47d6852717ab54d43e601c66dee1e1a0de6993"),
            hex!("c312d285cd9c597d7df9525133155f05aa94f206b31e2def255879b8bb27f25ccfaba516238c5de679545e7d0d88a5d0c0c975aae8a2e62369fcdeda4d02da42"),
            hex!("b3c99981ebeaeb773a6b48146af6f5f5ff740a6f0b6a7a324f21524985eba9ac624573f160415c82f836570e529ae449ff0225ded2536cb9c8b1a2678f13160f"),
            hex!("61c10247231339fe1649319067997f656a1a90a0482763a227378c96eaf07eb984018a897d0ed453729ca700d21753432c0cabef97ea9b32fcbd61268d0f7d11"),
        ];
        for (stage, digest) in CHAIN.iter().zip(expected) {
            assert_eq!(stage(&input[..]), digest);
        }
    }

    #[test]
    fn test_x11_of_known_inputs() {
        assert_eq!(
            x11(&[]),
            hex!("44fde7dceb280e1250101fd0281865dd3c145c3414ebd4696650592298df87e1")
        );
        assert_eq!(
            x11(&counting_bytes()),
            hex!("412e767aa9a39ee210ea9ce424de4ff5ee35e61a8c27506bc2365ff7d4e3ecce")
        );
    }
}
