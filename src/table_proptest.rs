#![cfg(test)]

// Property tests for Table kept inside the crate so they can check the
// structural invariants through `assert_invariants`.

use crate::table::{Keyed, Table, TABLE_SIZE};
use hashbrown::HashMap;
use proptest::prelude::*;

#[derive(Clone, Debug, PartialEq)]
struct Rec {
    key: i64,
    payload: i32,
}

impl Keyed for Rec {
    fn key(&self) -> i64 {
        self.key
    }
}

// Keys come from a narrow range (negatives included) so that buckets collide
// and chains grow past a single node.
#[derive(Clone, Debug)]
enum Op {
    Insert(i64, i32),
    Remove(i64),
    Find(i64),
    IsPresent(i64, i32),
    Fork(Vec<i64>),
    Assign(Vec<i64>),
    Clear,
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    let key = -25i64..25;
    let op = prop_oneof![
        6 => (key.clone(), any::<i32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        3 => key.clone().prop_map(Op::Remove),
        2 => key.clone().prop_map(Op::Find),
        1 => (key.clone(), any::<i32>()).prop_map(|(k, v)| Op::IsPresent(k, v)),
        1 => proptest::collection::vec(key.clone(), 0..6).prop_map(Op::Fork),
        1 => proptest::collection::vec(key, 0..6).prop_map(Op::Assign),
        1 => Just(Op::Clear),
    ];
    proptest::collection::vec(op, 1..100)
}

fn bucket_of(key: i64) -> usize {
    key.rem_euclid(TABLE_SIZE as i64) as usize
}

fn snapshot(t: &Table<Rec>) -> Vec<Vec<(i64, i32)>> {
    (0..TABLE_SIZE)
        .map(|i| {
            t.bucket(i)
                .expect("index below TABLE_SIZE")
                .iter()
                .map(|r| (r.key, r.payload))
                .collect()
        })
        .collect()
}

// Property: state-machine equivalence against hashbrown::HashMap plus a
// per-bucket order model.
// Invariants exercised across random operation sequences:
// - Every record sits in bucket key mod TABLE_SIZE; keys are unique.
// - size() equals the number of distinct live keys at every step.
// - Re-inserting a key overwrites in place and keeps its chain position;
//   new keys are linked at the head of their bucket.
// - remove/find report absent keys as None; absent removal is a no-op.
// - Copies are independent: mutating a clone never changes the source.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_table_state_machine(ops in arb_ops()) {
        let mut sut: Table<Rec> = Table::new();
        let mut model: HashMap<i64, i32> = HashMap::new();
        let mut order: Vec<Vec<i64>> = vec![Vec::new(); TABLE_SIZE];

        for op in ops {
            match op {
                Op::Insert(key, payload) => {
                    let prev = sut.insert(Rec { key, payload });
                    let expected = model.insert(key, payload);
                    prop_assert_eq!(prev.map(|r| r.payload), expected);
                    if expected.is_none() {
                        order[bucket_of(key)].insert(0, key);
                    }
                }
                Op::Remove(key) => {
                    let before = snapshot(&sut);
                    let removed = sut.remove(key).map(|r| r.payload);
                    prop_assert_eq!(removed, model.remove(&key));
                    if removed.is_some() {
                        order[bucket_of(key)].retain(|k| *k != key);
                    } else {
                        prop_assert_eq!(snapshot(&sut), before);
                    }
                }
                Op::Find(key) => {
                    prop_assert_eq!(sut.find(key).map(|r| r.payload), model.get(&key).copied());
                    let mut out = Rec { key: i64::MIN, payload: 0 };
                    let found = sut.find_into(key, &mut out);
                    prop_assert_eq!(found, model.contains_key(&key));
                    if !found {
                        prop_assert_eq!(out, Rec { key: i64::MIN, payload: 0 });
                    }
                }
                Op::IsPresent(key, payload) => {
                    prop_assert_eq!(sut.is_present(&Rec { key, payload }), model.contains_key(&key));
                }
                Op::Fork(keys) => {
                    let before = snapshot(&sut);
                    let mut fork = sut.clone();
                    prop_assert_eq!(snapshot(&fork), before.clone());
                    for k in keys {
                        if fork.remove(k).is_none() {
                            fork.insert(Rec { key: k, payload: -1 });
                        }
                    }
                    fork.assert_invariants();
                    prop_assert_eq!(snapshot(&sut), before);
                }
                Op::Assign(keys) => {
                    let source: Table<Rec> = keys
                        .iter()
                        .map(|&key| Rec { key, payload: 7 })
                        .collect();
                    sut.assign(&source);
                    model = keys.iter().map(|&k| (k, 7)).collect();
                    order = snapshot(&source)
                        .into_iter()
                        .map(|b| b.into_iter().map(|(k, _)| k).collect())
                        .collect();
                    prop_assert_eq!(snapshot(&sut), snapshot(&source));
                }
                Op::Clear => {
                    sut.clear();
                    model.clear();
                    order.iter_mut().for_each(Vec::clear);
                }
            }

            sut.assert_invariants();
            prop_assert_eq!(sut.size(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
            for (i, expected) in order.iter().enumerate() {
                prop_assert_eq!(&sut.bucket_keys(i).expect("index below TABLE_SIZE"), expected);
            }
        }

        for (&key, &payload) in &model {
            prop_assert_eq!(sut.get(key), Some(&Rec { key, payload }));
        }
    }
}
