//! 日历日期工具

use chrono::{Months, NaiveDate};

/// 按日历月前进
///
/// 目标月份没有对应日期时钳制到该月最后一天，
/// 如 2024-01-31 + 1 个月 = 2024-02-29。
/// 仅在日期超出 chrono 可表示范围时返回 None。
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_add_months_plain() {
        assert_eq!(add_months(d(2024, 3, 15), 3), Some(d(2024, 6, 15)));
        assert_eq!(add_months(d(2024, 11, 1), 2), Some(d(2025, 1, 1)));
    }

    #[test]
    fn test_add_months_clamps_to_month_end() {
        // 闰年二月
        assert_eq!(add_months(d(2024, 1, 31), 1), Some(d(2024, 2, 29)));
        // 平年二月
        assert_eq!(add_months(d(2023, 1, 31), 1), Some(d(2023, 2, 28)));
        // 31 号进 30 天的月份
        assert_eq!(add_months(d(2024, 8, 31), 1), Some(d(2024, 9, 30)));
    }

    #[test]
    fn test_add_months_full_year() {
        assert_eq!(add_months(d(2024, 1, 31), 12), Some(d(2025, 1, 31)));
    }

    #[test]
    fn test_add_months_zero() {
        assert_eq!(add_months(d(2024, 5, 10), 0), Some(d(2024, 5, 10)));
    }
}
