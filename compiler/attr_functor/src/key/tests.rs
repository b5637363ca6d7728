use pretty_assertions::assert_eq;
use rustc_hash::{FxHashMap, FxHashSet};

use super::*;

fn shape(dims: &[i64]) -> Attr {
    Attr::array(dims.iter().copied().map(Attr::int))
}

#[test]
fn equal_trees_share_a_map_slot() {
    let mut cache: FxHashMap<AttrKey, &str> = FxHashMap::default();
    cache.insert(AttrKey::new(shape(&[1, 3, 224, 224])), "image");
    cache.insert(AttrKey::new(shape(&[1, 1000])), "logits");

    assert_eq!(cache.get(&AttrKey::new(shape(&[1, 3, 224, 224]))), Some(&"image"));
    assert_eq!(cache.get(&AttrKey::new(shape(&[1000, 1]))), None);

    let previous = cache.insert(shape(&[1, 1000]).into(), "scores");
    assert_eq!(previous, Some("logits"));
    assert_eq!(cache.len(), 2);
}

#[test]
fn var_and_size_var_collapse_to_one_key() {
    let keys: FxHashSet<AttrKey> = [Attr::var("n"), Attr::size_var("n"), Attr::var("m")]
        .into_iter()
        .map(AttrKey::from)
        .collect();
    assert_eq!(keys.len(), 2);
}

#[test]
fn key_caches_structural_hash() {
    let node = Attr::add(Attr::var("x"), Attr::int(1));
    let key = AttrKey::new(node.clone());
    assert_eq!(key.structural_hash(), attrs_hash(&node));
    assert!(key.attr().same_as(&node));
    assert!(key.into_inner().same_as(&node));
}

#[test]
fn keys_compare_structurally() {
    let a = AttrKey::new(Attr::call("f", [Attr::var("x")]));
    let b = AttrKey::new(Attr::call("f", [Attr::var("x")]));
    let c = AttrKey::new(Attr::call("g", [Attr::var("x")]));
    assert_eq!(a, b);
    assert!(a != c);
}
