use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

/// 出生日期下限
static MIN_BIRTHDATE: Lazy<NaiveDate> =
    Lazy::new(|| NaiveDate::from_ymd_opt(1900, 1, 1).expect("Invalid min birthdate"));

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    // 只做格式校验，不验证邮箱真实存在
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

pub fn validate_birthdate(birthdate: NaiveDate) -> Result<(), &'static str> {
    if birthdate < *MIN_BIRTHDATE {
        return Err("Birthdate must not be before 1900-01-01");
    }
    if birthdate > chrono::Utc::now().date_naive() {
        return Err("Birthdate must not be in the future");
    }
    Ok(())
}

/// 体重（kg），范围 0 ~ 300
pub fn validate_weight(weight: f64) -> Result<(), &'static str> {
    if !weight.is_finite() || !(0.0..=300.0).contains(&weight) {
        return Err("Weight must be between 0 and 300 kg");
    }
    Ok(())
}

/// 身高（m），范围 0 ~ 3.0
pub fn validate_height(height: f64) -> Result<(), &'static str> {
    if !height.is_finite() || !(0.0..=3.0).contains(&height) {
        return Err("Height must be between 0 and 3 meters");
    }
    Ok(())
}

/// 套餐时长（月），至少 1 个月
pub fn validate_duration(duration: i32) -> Result<(), &'static str> {
    if duration < 1 {
        return Err("Duration must be at least 1 month");
    }
    Ok(())
}

/// 套餐月单价，不允许为负
pub fn validate_price(price: Decimal) -> Result<(), &'static str> {
    if price.is_sign_negative() {
        return Err("Price must not be negative");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_valid_email() {
        assert!(validate_email("student@gympoint.com").is_ok());
        assert!(validate_email("a.b+c@example.co").is_ok());
    }

    #[test]
    fn test_invalid_email() {
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("missing@tld").is_err());
        assert!(validate_email("@example.com").is_err());
    }

    #[test]
    fn test_birthdate_bounds() {
        assert!(validate_birthdate(NaiveDate::from_ymd_opt(1990, 5, 20).unwrap()).is_ok());
        assert!(validate_birthdate(NaiveDate::from_ymd_opt(1900, 1, 1).unwrap()).is_ok());
        assert!(validate_birthdate(NaiveDate::from_ymd_opt(1899, 12, 31).unwrap()).is_err());
        assert!(validate_birthdate(NaiveDate::from_ymd_opt(2999, 1, 1).unwrap()).is_err());
    }

    #[test]
    fn test_weight_range() {
        assert!(validate_weight(72.5).is_ok());
        assert!(validate_weight(0.0).is_ok());
        assert!(validate_weight(300.0).is_ok());
        assert!(validate_weight(300.1).is_err());
        assert!(validate_weight(-1.0).is_err());
        assert!(validate_weight(f64::NAN).is_err());
    }

    #[test]
    fn test_height_range() {
        assert!(validate_height(1.72).is_ok());
        assert!(validate_height(3.0).is_ok());
        assert!(validate_height(3.01).is_err());
        assert!(validate_height(-0.5).is_err());
    }

    #[test]
    fn test_duration() {
        assert!(validate_duration(1).is_ok());
        assert!(validate_duration(12).is_ok());
        assert!(validate_duration(0).is_err());
        assert!(validate_duration(-3).is_err());
    }

    #[test]
    fn test_price() {
        assert!(validate_price(dec("129.90")).is_ok());
        assert!(validate_price(dec("0")).is_ok());
        assert!(validate_price(dec("-0.01")).is_err());
    }
}
