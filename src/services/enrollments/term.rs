//! 报名期限推导
//!
//! 结束日期和总价都从套餐算出来，落库后不再跟随套餐变动。

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::plans::entities::Plan;
use crate::utils::date::add_months;

/// 套餐总价 = 月单价 × 月数，十进制精确运算
pub(crate) fn total_price(plan: &Plan) -> Decimal {
    plan.price * Decimal::from(plan.duration)
}

/// 结束日期 = 开始日期 + 套餐月数
///
/// 超出 chrono 可表示范围时返回 None。
pub(crate) fn end_date_for(plan: &Plan, start_date: NaiveDate) -> Option<NaiveDate> {
    add_months(start_date, plan.duration as u32)
}

/// 更新报名时的重算范围
///
/// - 换了套餐：end_date 和 price 都按新套餐重算；
/// - 只改开始日期：end_date 按当前套餐重算，price 保持原值。
///
/// 开始日期没改时用库里存的值，返回 (end_date, 重算后的 price)。
pub(crate) fn recompute_term(
    plan: &Plan,
    stored_start: NaiveDate,
    new_start: Option<NaiveDate>,
    plan_changed: bool,
) -> Option<(NaiveDate, Option<Decimal>)> {
    let start = new_start.unwrap_or(stored_start);
    let end_date = end_date_for(plan, start)?;
    let price = if plan_changed {
        Some(total_price(plan))
    } else {
        None
    };
    Some((end_date, price))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(duration: i32, price: &str) -> Plan {
        Plan {
            id: 1,
            title: "Gold".to_string(),
            duration,
            price: price.parse().unwrap(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn total_price_is_exact() {
        assert_eq!(total_price(&plan(3, "109.90")), dec("329.70"));
        assert_eq!(total_price(&plan(12, "89.99")), dec("1079.88"));
        // 浮点会在这里丢精度，Decimal 不会
        assert_eq!(total_price(&plan(3, "0.10")), dec("0.30"));
    }

    #[test]
    fn end_date_follows_plan_duration() {
        assert_eq!(
            end_date_for(&plan(1, "109.00"), d(2024, 1, 31)),
            Some(d(2024, 2, 29))
        );
        assert_eq!(
            end_date_for(&plan(12, "109.00"), d(2024, 1, 31)),
            Some(d(2025, 1, 31))
        );
    }

    #[test]
    fn plan_change_recomputes_from_stored_start() {
        let (end, price) = recompute_term(&plan(6, "89.00"), d(2024, 3, 1), None, true).unwrap();
        assert_eq!(end, d(2024, 9, 1));
        assert_eq!(price, Some(dec("534.00")));
    }

    #[test]
    fn start_change_keeps_price() {
        let (end, price) =
            recompute_term(&plan(3, "109.00"), d(2024, 3, 1), Some(d(2024, 5, 10)), false)
                .unwrap();
        assert_eq!(end, d(2024, 8, 10));
        assert_eq!(price, None);
    }

    #[test]
    fn both_changed_recomputes_from_new_start() {
        let (end, price) =
            recompute_term(&plan(6, "89.00"), d(2024, 3, 1), Some(d(2024, 4, 1)), true).unwrap();
        assert_eq!(end, d(2024, 10, 1));
        assert_eq!(price, Some(dec("534.00")));
    }
}
