use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 打卡实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/checkin.ts")]
pub struct Checkin {
    pub id: i64,
    pub student_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 打卡准入判定结果
//
// 两个拒绝分支都是业务判定而非错误，存储层在同一把学员锁内
// 完成判定与落库，调用方按分支映射响应。
#[derive(Debug, Clone)]
pub enum CheckinOutcome {
    /// 判定通过，打卡已落库
    Recorded(Checkin),
    /// 当天没有生效中的报名
    NoActiveEnrollment,
    /// 最近 7 天滚动窗口内已打满 5 次
    LimitReached,
}
