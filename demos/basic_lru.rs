use lrukit::policy::lru::LruCache;
use std::thread;

fn main() {
    env_logger::init();

    let cache: LruCache<String, String> = LruCache::new(2);

    cache.set("alpha".to_string(), "first".to_string());
    cache.set("beta".to_string(), "second".to_string());

    if let Some(value) = cache.get(&"alpha".to_string()) {
        println!("hit alpha: {}", value);
    }

    cache.set("gamma".to_string(), "third".to_string());
    println!("contains beta? {}", cache.contains(&"beta".to_string()));

    let workers: Vec<_> = (0..4)
        .map(|id| {
            let cache = cache.clone();
            thread::spawn(move || {
                cache.set(format!("worker-{}", id), format!("payload-{}", id));
            })
        })
        .collect();
    for w in workers {
        w.join().unwrap();
    }
    println!("len after workers: {} (capacity {})", cache.len(), cache.capacity());
}

// Expected output:
// hit alpha: first
// contains beta? false
// len after workers: 2 (capacity 2)
//
// Explanation: capacity=2; after get(alpha), beta is least recently used,
// so setting gamma evicts beta. Run with RUST_LOG=lrukit=trace to see the
// evictions logged.
