use tiny_keccak::{Hasher, Keccak};

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut output);
    output
}

/// Returns the first 4 bytes of the Keccak-256 hash of `signature`,
/// hex encoded with a leading `0x`.
pub fn calculate_function_selector(signature: &str) -> String {
    let hash = keccak256(signature.as_bytes());
    format!("0x{}", hex::encode(&hash[..4]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_selector() {
        assert_eq!(
            calculate_function_selector("transfer(address,uint256)"),
            "0xa9059cbb"
        );
    }

    #[test]
    fn test_event_selector_is_hash_prefix() {
        assert_eq!(
            calculate_function_selector("Transfer(address,address,uint256)"),
            "0xddf252ad"
        );
    }

    #[test]
    fn test_empty_input_hash() {
        let hash = keccak256(b"");
        assert_eq!(
            hex::encode(hash),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }
}
