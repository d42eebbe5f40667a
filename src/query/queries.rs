/// 경매 행 잠금 조회 (같은 상품에 대한 다른 입찰 트랜잭션은 커밋까지 대기)
pub const LOCK_AUCTION: &str = r#"
    SELECT product_id, start_price, step_price, current_price, highest_bidder_id, bid_count
    FROM products
    WHERE product_id = $1
    FOR UPDATE
"#;

/// 경매 상태 조회
pub const GET_AUCTION: &str = r#"
    SELECT product_id, start_price, step_price, current_price, highest_bidder_id, bid_count
    FROM products
    WHERE product_id = $1
"#;

/// 경매 존재 여부
pub const AUCTION_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM products WHERE product_id = $1)";

/// 경매 생성 (상품 ID 지정)
pub const INSERT_AUCTION_WITH_ID: &str = r#"
    INSERT INTO products (product_id, start_price, step_price, current_price, bid_count)
    VALUES ($1, $2, $3, 0, 0)
    RETURNING product_id, start_price, step_price, current_price, highest_bidder_id, bid_count
"#;

/// 상품 ID 시퀀스를 현재 최대값으로 맞춤 (ID 지정 생성 후)
pub const SYNC_PRODUCT_ID_SEQUENCE: &str = r#"
    SELECT setval(
        pg_get_serial_sequence('products', 'product_id'),
        GREATEST((SELECT MAX(product_id) FROM products), 1)
    )
"#;

/// 경매 생성
pub const INSERT_AUCTION: &str = r#"
    INSERT INTO products (start_price, step_price, current_price, bid_count)
    VALUES ($1, $2, 0, 0)
    RETURNING product_id, start_price, step_price, current_price, highest_bidder_id, bid_count
"#;

/// 경매 갱신
pub const UPDATE_AUCTION: &str = r#"
    UPDATE products
    SET current_price = $2, highest_bidder_id = $3, bid_count = bid_count + 1
    WHERE product_id = $1
"#;

/// 자동 입찰 상한 조회
pub const GET_CEILING: &str =
    "SELECT max_amount FROM auto_bids WHERE product_id = $1 AND bidder_id = $2";

/// 자동 입찰 상한 upsert (올리기만 함)
pub const UPSERT_CEILING: &str = r#"
    INSERT INTO auto_bids (product_id, bidder_id, max_amount)
    VALUES ($1, $2, $3)
    ON CONFLICT (product_id, bidder_id)
    DO UPDATE SET max_amount = GREATEST(auto_bids.max_amount, EXCLUDED.max_amount)
"#;

/// 입찰 기록 추가
pub const INSERT_BID: &str =
    "INSERT INTO bids (product_id, bidder_id, amount, created_at) VALUES ($1, $2, $3, $4)";

/// 입찰 이력 조회
pub const GET_BID_HISTORY: &str = r#"
    SELECT b.created_at, u.full_name AS bidder_name, b.amount
    FROM bids b
    JOIN users u ON u.user_id = b.bidder_id
    WHERE b.product_id = $1
    ORDER BY b.created_at DESC, b.bid_id DESC
    LIMIT $2 OFFSET $3
"#;

/// 입찰 수 조회
pub const COUNT_BIDS: &str = "SELECT COUNT(*) FROM bids WHERE product_id = $1";

/// 현재 가격과 최고 입찰자 조회
pub const GET_HIGHEST_BID: &str = r#"
    SELECT p.current_price, u.user_id, u.full_name, u.positive_reviews, u.negative_reviews
    FROM products p
    LEFT JOIN users u ON u.user_id = p.highest_bidder_id
    WHERE p.product_id = $1
"#;

/// 입찰자 평판 조회
pub const GET_REPUTATION: &str =
    "SELECT positive_reviews, negative_reviews FROM users WHERE user_id = $1";
