#![no_main]

use libfuzzer_sys::fuzz_target;
use lrukit::ds::RecencyList;

// Fuzz arbitrary operation sequences on RecencyList
//
// Interleaves push_front, push_back, pop_back, move_to_front, remove and
// clear, checking list linkage after every step. Handles are kept after
// removal and clear, so stale ids hit slots that have since been reused.
fuzz_target!(|data: &[u8]| {
    let mut list: RecencyList<u32> = RecencyList::new();
    let mut ids = Vec::new();

    for pair in data.chunks_exact(2) {
        let op = pair[0] % 6;
        let value = u32::from(pair[1]);

        match op {
            0 => {
                let id = list.push_front(value);
                ids.push(id);
                assert_eq!(list.front_id(), Some(id));
                assert_eq!(list.front(), Some(&value));
            },
            1 => {
                let id = list.push_back(value);
                ids.push(id);
                assert_eq!(list.back_id(), Some(id));
            },
            2 => {
                let old_len = list.len();
                match list.pop_back() {
                    Some(_) => assert_eq!(list.len(), old_len - 1),
                    None => assert_eq!(old_len, 0),
                }
            },
            3 => {
                if !ids.is_empty() {
                    let id = ids[value as usize % ids.len()];
                    let live = list.contains(id);
                    assert_eq!(list.move_to_front(id), live);
                    if live {
                        assert_eq!(list.front_id(), Some(id));
                    }
                }
            },
            4 => {
                if !ids.is_empty() {
                    let id = ids[value as usize % ids.len()];
                    let live = list.contains(id);
                    let old_len = list.len();
                    assert_eq!(list.remove(id).is_some(), live);
                    if live {
                        assert_eq!(list.len(), old_len - 1);
                    }
                }
            },
            5 => {
                list.clear();
                assert!(list.is_empty());
            },
            _ => unreachable!(),
        }

        list.check_invariants().unwrap();
        assert_eq!(list.iter().count(), list.len());
    }
});
