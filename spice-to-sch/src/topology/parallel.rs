//! Parallel-group detection: same polarity, same source, same drain.

use crate::parser::schema::Transistor;

use super::pool::TransistorPool;
use super::{GroupKind, TransistorGroup};

pub fn find_parallel(pool: &mut TransistorPool<'_>) -> Vec<TransistorGroup> {
    let mut groups = Vec::new();
    let order = pool.remaining();

    for (pos, &i) in order.iter().enumerate() {
        if pool.is_claimed(i) {
            continue;
        }
        let t1 = pool.get(i);

        let mut members = vec![i];
        members.extend(
            order[pos + 1..]
                .iter()
                .copied()
                .filter(|&j| !pool.is_claimed(j) && is_parallel(t1, pool.get(j))),
        );

        if members.len() > 1 {
            pool.claim_all(&members);
            tracing::debug!(
                "Parallel group of {} on {} / {}",
                members.len(),
                t1.source,
                t1.drain
            );
            groups.push(TransistorGroup::new(GroupKind::Parallel, members));
        }
    }

    groups
}

fn is_parallel(t1: &Transistor, t2: &Transistor) -> bool {
    t1.source == t2.source && t1.drain == t2.drain && t1.polarity == t2.polarity
}
