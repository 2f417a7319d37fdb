//! Inverter-pair detection.

use crate::config::SupplyNets;
use crate::parser::schema::Transistor;

use super::pool::TransistorPool;
use super::{GroupKind, TransistorGroup};

/// Find PMOS/NMOS pairs that share one channel node and whose other channel
/// nodes are the supply and ground rails.
pub fn find_inverters(pool: &mut TransistorPool<'_>, nets: &SupplyNets) -> Vec<TransistorGroup> {
    let mut groups = Vec::new();
    let order = pool.remaining();

    for (pos, &i) in order.iter().enumerate() {
        if pool.is_claimed(i) {
            continue;
        }
        let t1 = pool.get(i);

        let partner = order[pos + 1..]
            .iter()
            .copied()
            .filter(|&j| !pool.is_claimed(j))
            .find(|&j| is_inverter_pair(t1, pool.get(j), nets));

        if let Some(j) = partner {
            pool.claim_all(&[i, j]);
            tracing::debug!("Inverter pair: {} + {}", t1.instance, pool.get(j).instance);
            groups.push(TransistorGroup::new(GroupKind::Inverter, vec![i, j]));
        }
    }

    groups
}

/// Channel node shared by `t1` and `t2`, preferring `t1.source`.
pub(crate) fn shared_node<'t>(t1: &'t Transistor, t2: &Transistor) -> Option<&'t str> {
    let touches = |node: &str| node == t2.source || node == t2.drain;
    if touches(&t1.source) {
        Some(&t1.source)
    } else if touches(&t1.drain) {
        Some(&t1.drain)
    } else {
        None
    }
}

/// The channel terminal of `t` that is not `shared`.
fn other_terminal<'t>(t: &'t Transistor, shared: &str) -> &'t str {
    if t.source == shared {
        &t.drain
    } else {
        &t.source
    }
}

pub(crate) fn is_inverter_pair(t1: &Transistor, t2: &Transistor, nets: &SupplyNets) -> bool {
    if t1.polarity == t2.polarity {
        return false;
    }
    let Some(shared) = shared_node(t1, t2) else {
        return false;
    };

    let (pmos, nmos) = if t1.is_pmos() { (t1, t2) } else { (t2, t1) };
    other_terminal(pmos, shared) == nets.supply && other_terminal(nmos, shared) == nets.ground
}
