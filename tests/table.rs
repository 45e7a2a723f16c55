// Table integration test suite.
//
// Each test documents what behavior is being verified and which
// invariants are assumed or asserted. The core invariants exercised:
// - Placement: a record with key k lives in bucket k mod TABLE_SIZE.
// - Uniqueness: inserting a present key overwrites, never duplicates.
// - Bookkeeping: size() equals the number of distinct live keys.
// - Value semantics: clones and assignments never share chains.
use chained_table::{Keyed, Table, TableError, TABLE_SIZE};
use std::sync::Once;

#[derive(Clone, Debug, PartialEq)]
struct Record {
    key: i64,
    name: String,
}

impl Keyed for Record {
    fn key(&self) -> i64 {
        self.key
    }
}

fn record(key: i64, name: &str) -> Record {
    Record {
        key,
        name: name.to_string(),
    }
}

static INIT: Once = Once::new();

fn init_test_logger() {
    INIT.call_once(|| {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::Trace)
            .is_test(true)
            .try_init();
    });
}

fn all_buckets<R: Keyed>(t: &Table<R>) -> Vec<Vec<i64>> {
    (0..TABLE_SIZE)
        .map(|i| t.bucket_keys(i).expect("index below TABLE_SIZE"))
        .collect()
}

// Test: colliding keys share one bucket, newest first; removal from the
// middle relinks the chain.
// Assumes: TABLE_SIZE == 10.
// Verifies: bucket 3 reads [23, 13, 3], then [23, 3] after remove(13).
#[test]
fn colliding_keys_scenario() {
    init_test_logger();
    let mut t: Table<Record> = Table::new();
    t.insert(record(3, "three"));
    t.insert(record(13, "thirteen"));
    t.insert(record(23, "twenty-three"));
    assert_eq!(t.bucket_keys(3).unwrap(), vec![23, 13, 3]);
    assert_eq!(t.size(), 3);

    t.remove(13);
    assert_eq!(t.bucket_keys(3).unwrap(), vec![23, 3]);
    assert_eq!(t.size(), 2);

    let mut out = record(-1, "sentinel");
    assert!(!t.find_into(13, &mut out));
    assert_eq!(out, record(-1, "sentinel"));
    assert!(t.find(13).is_none());
}

// Test: overwrite instead of duplicate.
// Assumes: records are compared by key for placement.
// Verifies: size stays put, the new payload wins, the old one is returned.
#[test]
fn overwrite_not_duplicate() {
    let mut t: Table<Record> = Table::new();
    assert!(t.insert(record(8, "first")).is_none());
    let replaced = t.insert(record(8, "second"));
    assert_eq!(replaced, Some(record(8, "first")));
    assert_eq!(t.size(), 1);
    assert_eq!(t.find(8), Some(record(8, "second")));
    assert_eq!(t.bucket_keys(8).unwrap(), vec![8]);
}

// Test: find after insert and after remove.
// Verifies: found with an equal value while present; not found afterwards.
#[test]
fn find_tracks_insert_and_remove() {
    let mut t: Table<Record> = Table::new();
    let e = record(57, "fifty-seven");
    t.insert(e.clone());
    assert_eq!(t.find(57), Some(e.clone()));
    assert_eq!(t.get(57), Some(&e));
    assert_eq!(t.remove(57), Some(e));
    assert!(t.find(57).is_none());
    assert!(t.is_empty());
}

// Test: removing keys that were never inserted.
// Verifies: size and every bucket are unchanged.
#[test]
fn removing_absent_keys_changes_nothing() {
    let mut t: Table<i64> = [1, 11, 21, 5].into_iter().collect();
    let before = all_buckets(&t);
    for k in [31, 2, -1, 1000] {
        assert!(t.remove(k).is_none());
    }
    assert_eq!(all_buckets(&t), before);
    assert_eq!(t.size(), 4);
}

// Test: is_present equality policy.
// Assumes: key-only equality.
// Verifies: a target with the same key but a different payload is present.
#[test]
fn is_present_uses_key_only() {
    let mut t: Table<Record> = Table::new();
    t.insert(record(12, "stored"));
    assert!(t.is_present(&record(12, "other")));
    assert!(!t.is_present(&record(2, "stored")));
}

// Test: size accuracy across a long mixed workload.
// Verifies: size() equals the number of distinct keys inserted minus removed.
#[test]
fn size_matches_distinct_keys() {
    let mut t: Table<i64> = Table::new();
    let mut live = std::collections::BTreeSet::new();
    let mut s: u64 = 1;
    for _ in 0..2_000 {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        let key = (s >> 33) as i64 % 200 - 100;
        if s & 1 == 0 {
            t.remove(key);
            live.remove(&key);
        } else {
            t.insert(key);
            live.insert(key);
        }
        assert_eq!(t.size(), live.len());
    }
    let stored: std::collections::BTreeSet<i64> = all_buckets(&t).into_iter().flatten().collect();
    assert_eq!(stored, live);
}

// Test: deep-copy independence in both directions.
// Verifies: mutations of the copy never show in the source and vice versa.
#[test]
fn copies_are_independent() {
    init_test_logger();
    let mut a: Table<Record> = Table::new();
    for k in 0..30 {
        a.insert(record(k, "orig"));
    }
    let a_before = all_buckets(&a);

    let mut b = a.clone();
    assert_eq!(all_buckets(&b), a_before);
    b.insert(record(100, "new"));
    b.insert(record(4, "changed"));
    b.remove(17);
    assert_eq!(all_buckets(&a), a_before);
    assert_eq!(a.find(4), Some(record(4, "orig")));

    let b_before = all_buckets(&b);
    a.clear();
    assert_eq!(all_buckets(&b), b_before);
    assert_eq!(b.size(), 30);
}

// Test: assignment over a populated table, then self-assignment.
// Verifies: the target mirrors the source; re-assigning from a snapshot of
// itself leaves contents and size unchanged.
#[test]
fn assignment_and_self_assignment() {
    let mut first: Table<i64> = (0..201).step_by(3).collect();
    let second: Table<i64> = (0..201).step_by(7).collect();

    for k in 0..201 {
        first.remove(k);
    }
    assert!(first.is_empty());

    first.assign(&second);
    assert_eq!(all_buckets(&first), all_buckets(&second));
    assert_eq!(first.size(), second.size());

    let before = all_buckets(&first);
    first = first.clone();
    let snapshot = first.clone();
    first.clone_from(&snapshot);
    assert_eq!(all_buckets(&first), before);
    assert_eq!(first.size(), second.size());
}

// Test: bucket printing.
// Verifies: `[i] NULL` for empty buckets, `[i] k1 -> k2` otherwise, and an
// error for out-of-range indices.
#[test]
fn bucket_printing() {
    let t: Table<i64> = [3, 13, -7].into_iter().collect();
    let mut out = Vec::new();
    for i in 0..TABLE_SIZE {
        t.write_bucket(i, &mut out).unwrap();
    }
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), TABLE_SIZE);
    assert_eq!(lines[0], "[0] NULL");
    assert_eq!(lines[3], "[3] -7 -> 13 -> 3");

    let err = t.write_bucket(TABLE_SIZE, &mut Vec::new()).unwrap_err();
    assert!(matches!(err, TableError::BucketOutOfRange { index: 10, buckets: 10 }));
    assert_eq!(err.to_string(), "bucket 10 is out of range for a table with 10 buckets");
}

// Test: bucket views expose chain order through the toolkit.
// Verifies: locate/search on a bucket agree with bucket_keys.
#[test]
fn bucket_view_is_a_chain() {
    let t: Table<i64> = [6, 16, 26].into_iter().collect();
    let chain = t.bucket(6).unwrap();
    assert_eq!(chain.len(), 3);
    let second = chain.locate(2).unwrap();
    assert_eq!(second.value(chain), Some(&16));
    assert_eq!(chain.search(&6), chain.locate(3));
}
