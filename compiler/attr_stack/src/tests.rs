use super::*;

/// A boxed linked chain, standing in for a deeply nested attribute tree.
enum Chain {
    End,
    Link(Box<Chain>),
}

fn build_chain(depth: usize) -> Chain {
    let mut chain = Chain::End;
    for _ in 0..depth {
        chain = Chain::Link(Box::new(chain));
    }
    chain
}

fn chain_depth(chain: &Chain) -> usize {
    ensure_sufficient_stack(|| match chain {
        Chain::End => 0,
        Chain::Link(next) => chain_depth(next) + 1,
    })
}

fn drop_chain(chain: Chain) {
    // Iterative teardown so the test itself cannot overflow on drop.
    let mut current = chain;
    while let Chain::Link(next) = current {
        current = *next;
    }
}

#[test]
fn shallow_walk() {
    let chain = build_chain(16);
    assert_eq!(chain_depth(&chain), 16);
    drop_chain(chain);
}

#[test]
fn deep_walk_grows_stack() {
    let chain = build_chain(200_000);
    assert_eq!(chain_depth(&chain), 200_000);
    drop_chain(chain);
}

#[test]
fn passes_result_through() {
    let result: Result<u64, &str> = ensure_sufficient_stack(|| Ok(7));
    assert_eq!(result, Ok(7));
}
