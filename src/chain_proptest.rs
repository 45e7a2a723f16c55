#![cfg(test)]

// Property tests for Chain kept inside the crate next to the toolkit they
// exercise. The model is a Vec whose index 0 is the chain head.

use crate::chain::Chain;
use proptest::prelude::*;

// Positions are raw usizes reduced modulo the current length so that shrinking
// moves toward earlier nodes and shorter op lists.
#[derive(Clone, Debug)]
enum Op {
    HeadInsert(i8),
    InsertAfter(usize, i8),
    HeadRemove,
    RemoveAfter(usize),
    Locate(usize),
    Search(i8),
    CopyRange(usize, usize),
    Clear,
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    let value = -4i8..4;
    let op = prop_oneof![
        4 => value.clone().prop_map(Op::HeadInsert),
        4 => (any::<usize>(), value.clone()).prop_map(|(p, v)| Op::InsertAfter(p, v)),
        2 => Just(Op::HeadRemove),
        2 => any::<usize>().prop_map(Op::RemoveAfter),
        2 => (1usize..12).prop_map(Op::Locate),
        2 => value.prop_map(Op::Search),
        1 => (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::CopyRange(a, b)),
        1 => Just(Op::Clear),
    ];
    proptest::collection::vec(op, 1..80)
}

// Property: state-machine equivalence against a Vec.
// Invariants exercised across random operation sequences:
// - head_insert/insert_after/head_remove/remove_after edit exactly one position.
// - locate is 1-based and None past the end; search finds the first equal value.
// - copy_range copies the inclusive span and never disturbs the source; the
//   copy's handles never resolve in the source.
// - len/is_empty/iteration order match the model after every op.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_chain_state_machine(ops in arb_ops()) {
        let mut sut: Chain<i8> = Chain::new();
        let mut model: Vec<i8> = Vec::new();

        for op in ops {
            match op {
                Op::HeadInsert(v) => {
                    let h = sut.head_insert(v);
                    prop_assert_eq!(sut.head(), Some(h));
                    model.insert(0, v);
                }
                Op::InsertAfter(p, v) => {
                    if model.is_empty() { continue; }
                    let i = p % model.len();
                    let prev = sut.locate(i + 1).expect("position within model length");
                    let h = sut.insert_after(prev, v);
                    prop_assert_eq!(prev.next(&sut), Some(h));
                    model.insert(i + 1, v);
                }
                Op::HeadRemove => {
                    if model.is_empty() { continue; }
                    prop_assert_eq!(sut.head_remove(), model.remove(0));
                }
                Op::RemoveAfter(p) => {
                    if model.len() < 2 { continue; }
                    let i = p % (model.len() - 1);
                    let prev = sut.locate(i + 1).expect("position within model length");
                    prop_assert_eq!(sut.remove_after(prev), model.remove(i + 1));
                }
                Op::Locate(p) => {
                    let got = sut.locate(p).and_then(|h| h.value(&sut).copied());
                    prop_assert_eq!(got, model.get(p - 1).copied());
                }
                Op::Search(v) => {
                    let got = sut.search(&v);
                    let expected = model
                        .iter()
                        .position(|x| *x == v)
                        .and_then(|i| sut.locate(i + 1));
                    prop_assert_eq!(got, expected);
                }
                Op::CopyRange(a, b) => {
                    if model.is_empty() { continue; }
                    let (i, j) = {
                        let (a, b) = (a % model.len(), b % model.len());
                        (a.min(b), a.max(b))
                    };
                    let start = sut.locate(i + 1).expect("start in range");
                    let end = sut.locate(j + 1).expect("end in range");
                    let (mut piece, tail) = sut.copy_range(start, end);
                    let copied: Vec<i8> = piece.iter().copied().collect();
                    prop_assert_eq!(&copied[..], &model[i..=j]);
                    prop_assert_eq!(tail.value(&piece).copied(), Some(model[j]));
                    prop_assert_eq!(tail.next(&piece), None);
                    prop_assert!(tail.value(&sut).is_none());
                    // Mutating the piece must not reach back into the source.
                    piece.clear();
                }
                Op::Clear => {
                    sut.clear();
                    model.clear();
                }
            }

            let values: Vec<i8> = sut.iter().copied().collect();
            prop_assert_eq!(&values, &model);
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
        }

        let (copy, tail) = sut.copy();
        prop_assert_eq!(&copy, &sut);
        prop_assert_eq!(tail.and_then(|t| t.value(&copy).copied()), model.last().copied());
    }
}
