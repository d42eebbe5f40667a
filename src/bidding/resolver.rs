/// 자동 입찰(proxy bid) 결정 로직
/// 저장소와 무관한 순수 함수. 상한(ceiling)은 공식이 유도하는 값 이상으로 드러나지 않는다.
// region:    --- Imports
use crate::auction::model::{Amount, AuctionSnapshot, BidderId};
use crate::auction::outcome::BidOutcome;
use crate::error::BidError;

// endregion: --- Imports

/// 최소 입찰가 = max(시작가, 현재가 + 호가 단위)
pub fn min_bid_amount(start_price: Amount, current_price: Amount, step_price: Amount) -> Amount {
    start_price.max(current_price.saturating_add(step_price))
}

/// 스냅샷과 새 상한으로 입찰 결과 계산
pub fn resolve_bid(
    snapshot: &AuctionSnapshot,
    bidder_id: BidderId,
    placed_ceiling: Amount,
    prior_ceiling: Option<Amount>,
) -> Result<BidOutcome, BidError> {
    let auction = &snapshot.auction;

    let min_bid = min_bid_amount(
        auction.start_price,
        auction.current_price,
        auction.step_price,
    );
    if placed_ceiling < min_bid {
        return Err(BidError::below_minimum(min_bid));
    }

    let Some(leader_id) = auction.highest_bidder_id else {
        return Ok(BidOutcome::FirstBid {
            bidder_id,
            price: auction.start_price,
            ceiling: raise_only(prior_ceiling, placed_ceiling),
        });
    };

    // 상한 행이 없으면 현재가까지는 감당한다고 본다
    let leader_ceiling = snapshot.leader_ceiling.unwrap_or(auction.current_price);

    if bidder_id == leader_id {
        let stored = prior_ceiling.unwrap_or(leader_ceiling);
        return Ok(BidOutcome::SelfRaise {
            bidder_id,
            raised_to: (placed_ceiling > stored).then_some(placed_ceiling),
        });
    }

    let overtake_price = leader_ceiling.saturating_add(auction.step_price);
    let ceiling = raise_only(prior_ceiling, placed_ceiling);

    if placed_ceiling >= overtake_price {
        Ok(BidOutcome::Overtake {
            bidder_id,
            previous_leader_id: leader_id,
            price: overtake_price,
            ceiling,
        })
    } else {
        Ok(BidOutcome::HeldLead {
            leader_id,
            challenger_id: bidder_id,
            price: placed_ceiling.max(auction.current_price),
            challenger_ceiling: ceiling,
        })
    }
}

fn raise_only(stored: Option<Amount>, incoming: Amount) -> Amount {
    stored.map_or(incoming, |stored| stored.max(incoming))
}
