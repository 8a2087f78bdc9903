use std::collections::HashMap;
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use rtl_containers::{Dictionary, Vector};

macro_rules! push_back_bench {
    ($name: ident, $n: expr) => {
        fn $name(c: &mut Criterion) {
            let n: usize = $n;
            c.bench_function(stringify!($name), |b| {
                b.iter(|| {
                    let mut v = Vector::new();
                    for i in 0..n {
                        v.push_back(i);
                    }
                    black_box(v);
                })
            });
        }
    };
}

macro_rules! dict_find_rand_bench {
    ($name: ident, $n: expr, $buckets: expr) => {
        fn $name(c: &mut Criterion) {
            let n: usize = $n;
            let mut dict: Dictionary<usize, $buckets> = Dictionary::new();
            // setup
            let mut rng = StdRng::seed_from_u64(1);
            let keys: Vec<String> = (0..n).map(|_| (rng.gen::<usize>() % n).to_string()).collect();
            for (i, k) in keys.iter().enumerate() {
                *dict.get_or_insert(k) = i;
            }

            // measure
            let mut i = 0;
            c.bench_function(stringify!($name), |b| {
                b.iter(|| {
                    let t = dict.find(&keys[i]);
                    i = (i + 1) % n;
                    black_box(t);
                })
            });
        }
    };
}

macro_rules! dict_insert_miss_bench {
    ($name: ident, $n: expr, $buckets: expr) => {
        fn $name(c: &mut Criterion) {
            let n: usize = $n;
            let keys: Vec<String> = (0..n).map(|i| format!("key{i}")).collect();
            c.bench_function(stringify!($name), |b| {
                b.iter(|| {
                    let mut dict: Dictionary<usize, $buckets> = Dictionary::new();
                    for k in &keys {
                        *dict.get_or_insert(k) += 1;
                    }
                    black_box(dict);
                })
            });
        }
    };
}

fn std_hashmap_find_rand_10000(c: &mut Criterion) {
    let n = 10_000usize;
    let mut map = HashMap::new();
    let mut rng = StdRng::seed_from_u64(1);
    let keys: Vec<String> = (0..n).map(|_| (rng.gen::<usize>() % n).to_string()).collect();
    for (i, k) in keys.iter().enumerate() {
        map.insert(k.clone(), i);
    }

    let mut i = 0;
    c.bench_function("std_hashmap_find_rand_10000", |b| {
        b.iter(|| {
            let t = map.get(&keys[i]);
            i = (i + 1) % n;
            black_box(t);
        })
    });
}

push_back_bench! {push_back_100, 100}
push_back_bench! {push_back_10000, 10_000}
push_back_bench! {push_back_100000, 100_000}

dict_find_rand_bench! {find_rand_10000_buckets_64, 10_000, 64}
dict_find_rand_bench! {find_rand_10000_buckets_1024, 10_000, 1024}
dict_find_rand_bench! {find_rand_100_buckets_16, 100, 16}

dict_insert_miss_bench! {insert_miss_1000_buckets_64, 1000, 64}
dict_insert_miss_bench! {insert_miss_1000_buckets_1024, 1000, 1024}

criterion_group!(
    benches,
    push_back_100,
    push_back_10000,
    push_back_100000,
    find_rand_10000_buckets_64,
    find_rand_10000_buckets_1024,
    find_rand_100_buckets_16,
    std_hashmap_find_rand_10000,
    insert_miss_1000_buckets_64,
    insert_miss_1000_buckets_1024
);
criterion_main!(benches);
