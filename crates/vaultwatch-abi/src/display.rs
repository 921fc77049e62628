//! String rendering of decoded values.
//!
//! This is the flat form stored in `Event::args`: integers in decimal,
//! addresses EIP-55 checksummed, byte strings as 0x-hex, and arrays/tuples
//! comma-joined.

use alloy_dyn_abi::DynSolValue;

pub fn display_value(val: &DynSolValue) -> String {
    match val {
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Int(i, _) => i.to_string(),
        DynSolValue::Uint(u, _) => u.to_string(),
        DynSolValue::FixedBytes(word, size) => format!("0x{}", hex::encode(&word[..*size])),
        DynSolValue::Bytes(b) => format!("0x{}", hex::encode(b)),
        DynSolValue::String(s) => s.clone(),
        DynSolValue::Address(a) => a.to_checksum(None),
        DynSolValue::Function(f) => format!("0x{}", hex::encode(f.as_slice())),
        DynSolValue::Array(vals) | DynSolValue::FixedArray(vals) | DynSolValue::Tuple(vals) => {
            vals.iter().map(display_value).collect::<Vec<_>>().join(",")
        }
        #[allow(unreachable_patterns)]
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, B256, U256};

    #[test]
    fn uint256_is_decimal() {
        let big = U256::MAX;
        assert_eq!(
            display_value(&DynSolValue::Uint(big, 256)),
            "115792089237316195423570985008687907853269984665640564039457584007913129639935"
        );
    }

    #[test]
    fn address_is_checksummed() {
        let addr: Address = "0xd8da6bf26964af9d7eed9e03e53415d37aa96045".parse().unwrap();
        assert_eq!(
            display_value(&DynSolValue::Address(addr)),
            "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045"
        );
    }

    #[test]
    fn bytes32_array_is_comma_joined() {
        let a = B256::repeat_byte(0x11);
        let b = B256::repeat_byte(0x22);
        let arr = DynSolValue::Array(vec![
            DynSolValue::FixedBytes(a, 32),
            DynSolValue::FixedBytes(b, 32),
        ]);
        let s = display_value(&arr);
        assert_eq!(s, format!("0x{},0x{}", "11".repeat(32), "22".repeat(32)));
    }

    #[test]
    fn bool_renders_plainly() {
        assert_eq!(display_value(&DynSolValue::Bool(true)), "true");
    }
}
