//! Auto-escalation of standing proxy bids.
//!
//! Runs inside the same atomic commit as the bid that triggered it, over
//! in-memory copies of the auction and its bids. Conceptually each proxy
//! with headroom raises the price in $1.00 steps until every rival
//! ceiling is exceeded; the settlement below computes that fixpoint
//! directly instead of stepping.

use tracing::debug;

use crate::config::PROXY_STEP_CENTS;
use crate::domain::{Auction, Bid, BidKind, BidStatus};

pub(crate) fn index_of_highest_live(bids: &[Bid]) -> Option<usize> {
    bids.iter()
        .enumerate()
        .filter(|(_, b)| b.is_live())
        .max_by(|(_, a), (_, b)| {
            a.amount
                .cmp(&b.amount)
                .then(b.created_at.cmp(&a.created_at))
                .then(b.id.cmp(&a.id))
        })
        .map(|(i, _)| i)
}

/// Escalate standing proxy bids against the current leader.
///
/// The winner is the contender with the highest ceiling; it settles at
/// `min(own ceiling, runner-up ceiling + $1.00)`, never below its current
/// visible amount. Equal ceilings favor the earlier-placed bid, which
/// then settles at its ceiling. Beaten proxies are raised to their own
/// ceiling (capped at the winning amount) and marked Outbid.
///
/// Re-invoking with no new competing bid changes nothing.
pub(crate) fn resolve_standing_proxies(auction: &mut Auction, bids: &mut [Bid]) {
    let Some(leader_idx) = index_of_highest_live(bids) else {
        return;
    };
    let leading_amount = bids[leader_idx].amount;

    let mut contenders: Vec<usize> = bids
        .iter()
        .enumerate()
        .filter(|(i, b)| {
            *i != leader_idx
                && b.kind == BidKind::Proxy
                && b.is_standing()
                && b.ceiling() > leading_amount
        })
        .map(|(i, _)| i)
        .collect();
    if contenders.is_empty() {
        return;
    }
    contenders.push(leader_idx);

    // Highest ceiling wins; earlier placement wins ties.
    contenders.sort_by(|&a, &b| {
        bids[b]
            .ceiling()
            .cmp(&bids[a].ceiling())
            .then(bids[a].created_at.cmp(&bids[b].created_at))
            .then(bids[a].id.cmp(&bids[b].id))
    });

    let champion = contenders[0];
    let runner_up_ceiling = bids[contenders[1]].ceiling();

    if bids[champion].kind == BidKind::Proxy {
        let settle = (runner_up_ceiling + PROXY_STEP_CENTS).min(bids[champion].ceiling());
        bids[champion].amount = bids[champion].amount.max(settle);
    }
    let winning_amount = bids[champion].amount;

    for (i, bid) in bids.iter_mut().enumerate() {
        if i == champion {
            bid.status = BidStatus::Winning;
        } else if contenders.contains(&i) {
            bid.amount = bid.ceiling().min(winning_amount);
            bid.status = BidStatus::Outbid;
        } else if bid.is_live() {
            bid.status = BidStatus::Outbid;
        }
    }

    debug!(
        auction = %auction.id,
        bid = %bids[champion].id,
        amount = winning_amount,
        "proxy escalation settled"
    );
    auction.current_price = winning_amount;
}
