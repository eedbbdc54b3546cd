use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ContractorStats {
    pub points: i64,
    pub total_signups: i64,
    pub total_coupons: usize,
    pub active_coupons: usize,
}
