const BIT_MASKS: [u32; 32] = [
    0x1, 0x2, 0x4, 0x8, 0x10, 0x20, 0x40, 0x80, 0x100, 0x200, 0x400, 0x800, 0x1000, 0x2000, 0x4000,
    0x8000, 0x10000, 0x20000, 0x40000, 0x80000, 0x100000, 0x200000, 0x400000, 0x800000, 0x1000000,
    0x2000000, 0x4000000, 0x8000000, 0x10000000, 0x20000000, 0x40000000, 0x80000000,
];

/// The mask applied to every full-width value.
pub const U32_MASK: i64 = 0xffff_ffff;
/// The mask applied to every short (16-bit) value.
pub const U16_MASK: i64 = 0xffff;

/// Check whether a specific bit of a u32 value is set.
///
/// # Arguments
///
/// * `value` - The value to be tested.
/// * `bit` - The index of the bit, in the range 0 to 31 (inclusive).
#[inline(always)]
pub fn is_bit_set(value: u32, bit: u8) -> bool {
    (value & BIT_MASKS[(bit & 31) as usize]) != 0
}

/// Reduce a value to its 32-bit unsigned bit pattern.
///
/// # Arguments
///
/// * `value` - The value to be reduced. Negative values wrap using two's complement.
#[inline(always)]
pub fn unsigned32(value: i64) -> u32 {
    (value & U32_MASK) as u32
}

/// Interpret a 32-bit pattern as a two's complement signed value.
///
/// # Arguments
///
/// * `bits` - The bit pattern to be interpreted.
#[inline(always)]
pub fn signed32(bits: u32) -> i32 {
    let bits = bits as i64;

    // The minimum value is its own negation and is handled separately.
    if bits == 0x8000_0000 {
        return (-bits) as i32;
    }

    if bits & 0x8000_0000 == 0 {
        return (bits & 0x7fff_ffff) as i32;
    }

    (-((-bits) & 0x7fff_ffff)) as i32
}

/// Reduce a value to its 16-bit unsigned bit pattern.
///
/// # Arguments
///
/// * `value` - The value to be reduced. Negative values wrap using two's complement.
#[inline(always)]
pub fn unsigned16(value: i64) -> u16 {
    (value & U16_MASK) as u16
}

/// Interpret a 16-bit pattern as a two's complement signed value.
///
/// # Arguments
///
/// * `bits` - The bit pattern to be interpreted.
#[inline(always)]
pub fn signed16(bits: u16) -> i16 {
    let bits = bits as i32;

    if bits == 0x8000 {
        return (-bits) as i16;
    }

    if bits & 0x8000 == 0 {
        return (bits & 0x7fff) as i16;
    }

    (-((-bits) & 0x7fff)) as i16
}

/// Reinterpret a 32-bit pattern as an IEEE-754 single precision value.
#[inline(always)]
pub fn float_from_bits(bits: u32) -> f32 {
    f32::from_bits(bits)
}

/// Reinterpret an IEEE-754 single precision value as its 32-bit pattern.
#[inline(always)]
pub fn bits_from_float(value: f32) -> u32 {
    value.to_bits()
}

/// Truncate a value to its lowest byte and sign extend it to 32 bits.
pub fn sign_extend_byte(value: u32) -> u32 {
    if value & 0x80 != 0 {
        (value & 0xff) | 0xffff_ff00
    } else {
        value & 0xff
    }
}

/// Truncate a value to its lowest half-word and sign extend it to 32 bits.
pub fn sign_extend_half(value: u32) -> u32 {
    if value & 0x8000 != 0 {
        (value & 0xffff) | 0xffff_0000
    } else {
        value & 0xffff
    }
}

/// Reverse the order of the four byte lanes of a value.
pub fn byte_swap(value: u32) -> u32 {
    ((value & 0x0000_00ff) << 24)
        | ((value & 0x0000_ff00) << 8)
        | ((value & 0x00ff_0000) >> 8)
        | ((value & 0xff00_0000) >> 24)
}

/// Swap the two 16-bit halves of a value.
pub fn word_swap(value: u32) -> u32 {
    ((value & 0x0000_ffff) << 16) | ((value & 0xffff_0000) >> 16)
}

#[cfg(test)]
mod tests_utils {
    use super::*;

    /// A spread of bit patterns that covers the sign boundaries.
    const PATTERNS_32: [u32; 10] = [
        0x0000_0000,
        0x0000_0001,
        0x0000_7fff,
        0x0000_8000,
        0x7fff_ffff,
        0x8000_0000,
        0x8000_0001,
        0xdead_beef,
        0xffff_fffe,
        0xffff_ffff,
    ];

    #[test]
    fn test_signed32_boundaries() {
        let tests = [
            (0x0000_0000u32, 0i32),
            (0x0000_0001, 1),
            (0x7fff_ffff, i32::MAX),
            (0x8000_0000, i32::MIN),
            (0x8000_0001, i32::MIN + 1),
            (0xffff_fffe, -2),
            (0xffff_ffff, -1),
        ];

        for (i, (bits, expected)) in tests.iter().enumerate() {
            assert_eq!(
                signed32(*bits),
                *expected,
                "Test {i} Failed - incorrect signed interpretation of {bits:#010x}"
            );
        }
    }

    #[test]
    fn test_signed16_boundaries() {
        let tests = [
            (0x0000u16, 0i16),
            (0x7fff, i16::MAX),
            (0x8000, i16::MIN),
            (0x8001, i16::MIN + 1),
            (0xffff, -1),
        ];

        for (i, (bits, expected)) in tests.iter().enumerate() {
            assert_eq!(
                signed16(*bits),
                *expected,
                "Test {i} Failed - incorrect signed interpretation of {bits:#06x}"
            );
        }
    }

    #[test]
    fn test_signed_unsigned_round_trip() {
        for bits in PATTERNS_32 {
            assert_eq!(unsigned32(signed32(bits) as i64), bits);
        }

        // A prime stride visits every byte lane with varying values.
        for (i, bits) in (0..=u32::MAX).step_by(65_521).chain([u32::MAX]).enumerate() {
            assert_eq!(
                unsigned32(signed32(bits) as i64),
                bits,
                "Test {i} Failed - {bits:#010x} did not round trip"
            );
            assert_eq!(signed32(bits) < 0, bits >= 0x8000_0000);
        }

        // The 16-bit domain is small enough to check exhaustively.
        for bits in 0..=u16::MAX {
            assert_eq!(unsigned16(signed16(bits) as i64), bits);
        }
    }

    #[test]
    fn test_float_round_trip_keeps_nan_payloads() {
        let patterns = [0x7fc0_0001u32, 0xffc0_1234, 0x7f80_0001, 0x8000_0000, 0x3f80_0000];

        for bits in PATTERNS_32.iter().chain(patterns.iter()) {
            assert_eq!(bits_from_float(float_from_bits(*bits)), *bits);
        }
    }

    #[test]
    fn test_sign_extension() {
        assert_eq!(sign_extend_byte(0x80), 0xffff_ff80);
        assert_eq!(sign_extend_byte(0x1234_567f), 0x7f);
        assert_eq!(sign_extend_half(0x8000), 0xffff_8000);
        assert_eq!(sign_extend_half(0xffff_7fff), 0x7fff);
    }

    #[test]
    fn test_swaps() {
        assert_eq!(byte_swap(0x1122_3344), 0x4433_2211);
        assert_eq!(word_swap(0x1122_3344), 0x3344_1122);
    }

    #[test]
    fn test_bit_set() {
        assert!(is_bit_set(0x8000_0000, 31));
        assert!(!is_bit_set(0x8000_0000, 30));
        assert!(is_bit_set(0x1, 0));
    }
}
