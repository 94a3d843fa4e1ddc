//! Identifier helpers

use bech32::Bech32m;
use uuid7::uuid7;

// mint a fresh uuid7 and encode it as bech32m under the given prefix
pub fn new_uuid_to_bech32(hrp: &str) -> anyhow::Result<String> {
    let hrp = bech32::Hrp::parse(hrp)?;
    let encoded = bech32::encode::<Bech32m>(hrp, uuid7().as_bytes())?;
    Ok(encoded)
}

/// Checks that `id` decodes as bech32 under the expected prefix.
pub fn is_bech32_with_hrp(id: &str, hrp: &str) -> bool {
    match bech32::decode(id) {
        Ok((decoded, data)) => decoded.as_str() == hrp && data.len() == 16,
        Err(_) => false,
    }
}
