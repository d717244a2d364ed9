use lzodyn::error::LzoError;
use lzodyn::registry::{self, COMPRESSORS, DECOMPRESSORS};
use proptest::prelude::*;

const MIN_WRKMEM: usize = 2048 * std::mem::size_of::<*const u8>();

#[test]
fn every_compressor_entry_is_complete() {
    for (i, desc) in COMPRESSORS.iter().enumerate() {
        assert!(!desc.symbol.is_empty(), "selector {i}");
        assert!(desc.symbol.contains("_compress"), "selector {i}: {}", desc.symbol);
        assert!(desc.working_memory >= MIN_WRKMEM, "selector {i}");
    }
}

#[test]
fn every_decompressor_entry_is_complete() {
    for (i, desc) in DECOMPRESSORS.iter().enumerate() {
        assert!(!desc.symbol.is_empty(), "selector {i}");
        assert!(desc.symbol.contains("_decompress"), "selector {i}: {}", desc.symbol);
    }
}

#[test]
fn decompressor_symbols_are_distinct_and_well_formed() {
    let mut seen = std::collections::HashSet::new();
    for desc in &DECOMPRESSORS {
        assert!(seen.insert(desc.symbol), "duplicate symbol {}", desc.symbol);
        // Exactly one family prefix per entry.
        assert_eq!(desc.symbol.matches("lzo").count(), 1, "{}", desc.symbol);
    }
    assert_eq!(DECOMPRESSORS[17].symbol, "lzo1x_decompress_asm_fast_safe");
    assert_eq!(DECOMPRESSORS[18].symbol, "lzo1y_decompress");
}

#[test]
fn family_boundaries_match_the_public_contract() {
    assert_eq!(COMPRESSORS[0].symbol, "lzo1_compress");
    assert_eq!(COMPRESSORS[2].symbol, "lzo1a_compress");
    assert_eq!(COMPRESSORS[4].symbol, "lzo1b_compress");
    assert_eq!(COMPRESSORS[18].symbol, "lzo1c_compress");
    assert_eq!(COMPRESSORS[32].symbol, "lzo1f_1_compress");
    assert_eq!(COMPRESSORS[34].symbol, "lzo1x_1_compress");
    assert_eq!(COMPRESSORS[38].symbol, "lzo1x_999_compress");
    assert_eq!(COMPRESSORS[39].symbol, "lzo1y_1_compress");
    assert_eq!(COMPRESSORS[41].symbol, "lzo1z_999_compress");
    assert_eq!(COMPRESSORS[42].symbol, "lzo2a_999_compress");

    assert_eq!(DECOMPRESSORS[0].symbol, "lzo1_decompress");
    assert_eq!(DECOMPRESSORS[12].symbol, "lzo1x_decompress");
    assert_eq!(DECOMPRESSORS[13].symbol, "lzo1x_decompress_safe");
    assert_eq!(DECOMPRESSORS[24].symbol, "lzo1z_decompress");
    assert_eq!(DECOMPRESSORS[27].symbol, "lzo2a_decompress_safe");
}

#[test]
fn working_memory_follows_the_family_formulas() {
    let dict = std::mem::size_of::<*const u8>();
    assert_eq!(COMPRESSORS[0].working_memory, 8192 * dict);
    assert_eq!(COMPRESSORS[1].working_memory, 65536 * dict);
    assert_eq!(COMPRESSORS[34].working_memory, 16384 * dict);
    assert_eq!(COMPRESSORS[35].working_memory, 2048 * dict);
    assert_eq!(COMPRESSORS[37].working_memory, 32768 * dict);
    assert_eq!(COMPRESSORS[38].working_memory, 14 * 16384 * 2);
    assert_eq!(COMPRESSORS[42].working_memory, 8 * 16384 * 2);
}

proptest! {
    #[test]
    fn in_range_compressor_lookup_succeeds(selector in 0u32..43) {
        let desc = registry::compressor(selector).unwrap();
        prop_assert!(!desc.symbol.is_empty());
        prop_assert!(desc.working_memory >= MIN_WRKMEM);
    }

    #[test]
    fn out_of_range_compressor_lookup_fails(selector in 43u32..) {
        prop_assert_eq!(
            registry::compressor(selector),
            Err(LzoError::InvalidSelector { selector, table_len: 43 })
        );
    }

    #[test]
    fn in_range_decompressor_lookup_succeeds(selector in 0u32..28) {
        prop_assert!(registry::decompressor(selector).is_ok());
    }

    #[test]
    fn out_of_range_decompressor_lookup_fails(selector in 28u32..) {
        prop_assert_eq!(
            registry::decompressor(selector),
            Err(LzoError::InvalidSelector { selector, table_len: 28 })
        );
    }
}
