use super::model::{Amount, BidderId};
use serde::{Deserialize, Serialize};

/// 입찰 처리 결과
/// 리졸버가 만들고 라이터가 그대로 반영한다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BidOutcome {
    // 첫 입찰: 현재가는 시작가로 고정
    FirstBid {
        bidder_id: BidderId,
        price: Amount,
        ceiling: Amount,
    },
    // 최고 입찰자가 자신의 상한만 올림 (None 이면 변경 없음)
    SelfRaise {
        bidder_id: BidderId,
        raised_to: Option<Amount>,
    },
    // 도전자가 기존 최고 입찰자를 추월
    Overtake {
        bidder_id: BidderId,
        previous_leader_id: BidderId,
        price: Amount,
        ceiling: Amount,
    },
    // 기존 최고 입찰자가 자리를 지킴
    HeldLead {
        leader_id: BidderId,
        challenger_id: BidderId,
        price: Amount,
        challenger_ceiling: Amount,
    },
}

/// 경매 행 갱신 내용 (bid_count 는 항상 +1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuctionUpdate {
    pub current_price: Amount,
    pub highest_bidder_id: BidderId,
}

/// 공개 입찰 기록 추가 내용
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerEntry {
    pub bidder_id: BidderId,
    pub amount: Amount,
}

/// 자동 입찰 상한 upsert 내용
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CeilingWrite {
    pub bidder_id: BidderId,
    pub max_amount: Amount,
}

impl BidOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            BidOutcome::FirstBid { .. } => "FirstBid",
            BidOutcome::SelfRaise { .. } => "SelfRaise",
            BidOutcome::Overtake { .. } => "Overtake",
            BidOutcome::HeldLead { .. } => "HeldLead",
        }
    }

    pub fn auction_update(&self) -> Option<AuctionUpdate> {
        match *self {
            BidOutcome::FirstBid {
                bidder_id, price, ..
            }
            | BidOutcome::Overtake {
                bidder_id, price, ..
            } => Some(AuctionUpdate {
                current_price: price,
                highest_bidder_id: bidder_id,
            }),
            BidOutcome::HeldLead {
                leader_id, price, ..
            } => Some(AuctionUpdate {
                current_price: price,
                highest_bidder_id: leader_id,
            }),
            BidOutcome::SelfRaise { .. } => None,
        }
    }

    /// 기록되는 입찰자는 제출자가 아니라 결과상의 최고 입찰자
    pub fn ledger_entry(&self) -> Option<LedgerEntry> {
        self.auction_update().map(|update| LedgerEntry {
            bidder_id: update.highest_bidder_id,
            amount: update.current_price,
        })
    }

    pub fn ceiling_write(&self) -> Option<CeilingWrite> {
        match *self {
            BidOutcome::FirstBid {
                bidder_id, ceiling, ..
            }
            | BidOutcome::Overtake {
                bidder_id, ceiling, ..
            } => Some(CeilingWrite {
                bidder_id,
                max_amount: ceiling,
            }),
            BidOutcome::HeldLead {
                challenger_id,
                challenger_ceiling,
                ..
            } => Some(CeilingWrite {
                bidder_id: challenger_id,
                max_amount: challenger_ceiling,
            }),
            BidOutcome::SelfRaise {
                bidder_id,
                raised_to,
            } => raised_to.map(|max_amount| CeilingWrite {
                bidder_id,
                max_amount,
            }),
        }
    }

    /// 아무것도 쓰지 않는 결과인지 여부
    pub fn is_noop(&self) -> bool {
        self.auction_update().is_none() && self.ceiling_write().is_none()
    }
}
