//! Snapshot line parsing.
//!
//! Each useful line starts with `<address>,<balance>`, where the address is
//! made of `[1-9a-zA-Z]` and the balance of decimal digits. Anything after the
//! balance digits is ignored; lines that do not start this way are skipped.

/// Parse one snapshot line.
pub fn parse_wallet_line(line: &str) -> Option<(String, u64)> {
    let (address, rest) = line.split_once(',')?;
    let valid_address = !address.is_empty()
        && address
            .chars()
            .all(|c| c.is_ascii_alphanumeric() && c != '0');
    if !valid_address {
        return None;
    }
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let balance = rest[..digits_len].parse().ok()?;
    Some((address.to_string(), balance))
}

/// Parse every line of a snapshot, returning the pairs in file order and the
/// number of non-empty lines that were skipped.
pub fn parse_wallets(text: &str) -> (Vec<(String, u64)>, usize) {
    let mut pairs = Vec::new();
    let mut skipped = 0;
    for line in text.lines() {
        match parse_wallet_line(line) {
            Some(pair) => pairs.push(pair),
            None if line.trim().is_empty() => {}
            None => {
                tracing::debug!("Skipping snapshot line: {line}");
                skipped += 1;
            }
        }
    }
    (pairs, skipped)
}
