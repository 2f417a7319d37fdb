//! Series-chain detection and chain ordering.

use std::collections::{HashMap, HashSet};

use crate::parser::schema::{Transistor, TransistorId};

use super::pool::TransistorPool;
use super::{GroupKind, TransistorGroup};

pub fn find_series(pool: &mut TransistorPool<'_>) -> Vec<TransistorGroup> {
    let mut groups = Vec::new();
    let order = pool.remaining();

    for &i in &order {
        if pool.is_claimed(i) {
            continue;
        }

        let chain = grow_chain(pool, i);
        if chain.len() < 2 {
            continue;
        }

        let (members, exact) = order_chain(pool, &chain);
        pool.claim_all(&members);

        let instances: Vec<&str> = members.iter().map(|&id| pool.get(id).instance.as_str()).collect();
        if exact {
            tracing::debug!("Series chain: {}", instances.join(" - "));
        } else {
            tracing::warn!(
                "Series chain {} is not a simple path; ordering is approximate",
                instances.join(" - ")
            );
        }

        let mut group = TransistorGroup::new(GroupKind::Series, members);
        group.approximate = !exact;
        groups.push(group);
    }

    groups
}

/// Collect every unclaimed transistor of `seed`'s polarity reachable through
/// shared source/drain nodes, in discovery order.
fn grow_chain(pool: &TransistorPool<'_>, seed: TransistorId) -> Vec<TransistorId> {
    let first = pool.get(seed);
    let mut chain = vec![seed];
    let mut connected: HashSet<&str> = HashSet::from([first.source.as_str(), first.drain.as_str()]);

    loop {
        let next = pool.remaining().into_iter().find(|id| {
            let t = pool.get(*id);
            !chain.contains(id)
                && t.polarity == first.polarity
                && (connected.contains(t.source.as_str()) || connected.contains(t.drain.as_str()))
        });

        let Some(id) = next else {
            break;
        };
        let t = pool.get(id);
        connected.insert(t.source.as_str());
        connected.insert(t.drain.as_str());
        chain.push(id);
    }

    chain
}

/// Put chain members in physical connection order.
///
/// Starts from an endpoint (a member with a channel terminal no other member
/// touches) and walks from tail to neighbour. Returns `false` as the second
/// element when some step had no connected neighbour and the next unplaced
/// member was appended instead.
fn order_chain(pool: &TransistorPool<'_>, chain: &[TransistorId]) -> (Vec<TransistorId>, bool) {
    let start = chain
        .iter()
        .position(|&id| is_endpoint(id, chain, pool))
        .unwrap_or(0);

    let mut remaining: Vec<TransistorId> = chain.to_vec();
    let mut current = remaining.remove(start);
    let mut ordered = vec![current];
    let mut exact = true;

    while !remaining.is_empty() {
        let tail = pool.get(current);
        let idx = match remaining
            .iter()
            .position(|&id| pool.get(id).shares_channel_node(tail))
        {
            Some(idx) => idx,
            None => {
                exact = false;
                0
            }
        };
        current = remaining.remove(idx);
        ordered.push(current);
    }

    (ordered, exact)
}

fn is_endpoint(id: TransistorId, chain: &[TransistorId], pool: &TransistorPool<'_>) -> bool {
    let t = pool.get(id);
    let mut source_links = 0;
    let mut drain_links = 0;
    for &other in chain.iter().filter(|&&other| other != id) {
        let o = pool.get(other);
        if t.source == o.source || t.source == o.drain {
            source_links += 1;
        }
        if t.drain == o.source || t.drain == o.drain {
            drain_links += 1;
        }
    }
    source_links == 0 || drain_links == 0
}

/// Source/drain names that occur exactly once across the chain, in first-seen
/// order. These are the nodes the chain exposes to the rest of the circuit.
pub fn external_nodes<'t>(members: impl IntoIterator<Item = &'t Transistor>) -> Vec<&'t str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for t in members {
        for node in [t.source.as_str(), t.drain.as_str()] {
            let count = counts.entry(node).or_insert(0);
            if *count == 0 {
                order.push(node);
            }
            *count += 1;
        }
    }
    order.into_iter().filter(|node| counts[node] == 1).collect()
}
