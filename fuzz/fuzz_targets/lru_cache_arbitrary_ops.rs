#![no_main]

use libfuzzer_sys::fuzz_target;
use lrukit::policy::lru::LruCore;
use std::sync::Arc;

// Fuzz arbitrary Get/Set/Remove/Clear sequences on LruCore
//
// The first byte picks the capacity. After every operation the index and
// recency list must agree, stay within capacity, and the touched key must
// sit at the MRU position.
fuzz_target!(|data: &[u8]| {
    let Some((&cap_byte, ops)) = data.split_first() else {
        return;
    };
    let capacity = usize::from(cap_byte % 32) + 1;
    let mut cache: LruCore<u8, u32> = LruCore::new(capacity);

    for pair in ops.chunks_exact(2) {
        let key = pair[1] % 64;
        match pair[0] % 8 {
            0..=3 => {
                let existed = cache.contains(&key);
                assert_eq!(cache.insert(key, Arc::new(u32::from(pair[0]))), existed);
                assert_eq!(cache.keys_mru().first(), Some(&key));
            },
            4 | 5 => {
                if cache.get(&key).is_some() {
                    assert_eq!(cache.keys_mru().first(), Some(&key));
                }
            },
            6 => {
                cache.remove(&key);
                assert!(!cache.contains(&key));
            },
            7 => {
                cache.clear();
                assert!(cache.is_empty());
            },
            _ => unreachable!(),
        }

        assert!(cache.len() <= capacity);
        cache.check_invariants().unwrap();
    }
});
