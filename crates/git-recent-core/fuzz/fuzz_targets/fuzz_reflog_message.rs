#![no_main]

use git_recent_core::reflog::parse_checkout;
use git_recent_core::{RecentRefResolver, ReflogEntry};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Some(checkout) = parse_checkout(text) {
        assert!(!checkout.to.is_empty());
        assert!(!checkout.to.contains(char::is_whitespace));
    }

    // Every line becomes an entry; resolution must never panic or duplicate.
    let entries: Vec<ReflogEntry> = text
        .lines()
        .enumerate()
        .map(|(i, line)| {
            ReflogEntry::new(i as i64, "0".repeat(40), "ab".repeat(20), Some(line.to_string()))
        })
        .collect();
    let resolver = RecentRefResolver::new(8).expect("positive limit");
    let names = resolver.resolve(&entries);
    let mut unique = names.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), names.len());
});
