/// Reverse the bit scrambling applied to the device identifier.
///
/// The transmitter spreads a 3-byte identifier across byte boundaries at
/// the bit level; this rebuilds each output byte from shifted and masked
/// ranges of two or three adjacent input bytes. The fourth output byte is
/// a self-check, the XOR of the first three. Purely combinational, no
/// state.
pub fn descramble_id(scrambled: [u8; 4]) -> [u8; 4] {
    let [in0, in1, in2, in3] = scrambled;

    let out0 = (in0 >> 3) | ((in0 & 0x04) << 5) | ((in1 & 0x01) << 6) | ((in2 & 0x01) << 5);
    let out1 = (in1 >> 1) | ((in0 & 0x01) << 7) | (in2 >> 7);
    let out2 = ((in2 & 0x7C) << 1) | (in3 >> 5);

    [out0, out1, out2, out0 ^ out1 ^ out2]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vector() {
        // scrambled bytes whose descramble is the identifier AB CD EF
        assert_eq!(
            descramble_id([0x5D, 0x9A, 0x75, 0xE5]),
            [0xAB, 0xCD, 0xEF, 0x89]
        );
    }

    #[test]
    fn zero_maps_to_zero() {
        assert_eq!(descramble_id([0, 0, 0, 0]), [0, 0, 0, 0]);
    }

    #[test]
    fn deterministic() {
        let input = [0x3C, 0x81, 0xF6, 0x42];
        assert_eq!(descramble_id(input), descramble_id(input));
    }

    #[test]
    fn self_check_byte_is_xor_of_first_three() {
        for _ in 0..64 {
            let input: [u8; 4] = [
                rand::random(),
                rand::random(),
                rand::random(),
                rand::random(),
            ];
            let out = descramble_id(input);
            assert_eq!(out[3], out[0] ^ out[1] ^ out[2]);
        }
    }

    #[test]
    fn low_bits_of_final_byte_are_ignored() {
        // only the top 3 bits of the fourth scrambled byte participate
        let a = descramble_id([0x5D, 0x9A, 0x75, 0xE0]);
        let b = descramble_id([0x5D, 0x9A, 0x75, 0xFF]);
        assert_eq!(a, b);
    }
}
