use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 列表页大小固定为 20 条
pub const PAGE_SIZE: i64 = 20;

// 分页查询参数，页码从 1 开始，页大小固定
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PageQuery {
    #[serde(default = "default_page", deserialize_with = "lenient_i64")]
    pub page: i64,
}

// 列表响应里携带的分页元数据
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

// 查询串里的数字以字符串到达，JSON 里是数字，两种都接受
fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(i64),
        Text(String),
    }

    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => Ok(n),
        NumberOrText::Text(s) => s
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid page number: {s}"))),
    }
}

fn default_page() -> i64 {
    1
}

impl Default for PageQuery {
    fn default() -> Self {
        Self { page: 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_accepts_number_and_string() {
        let from_number: PageQuery = serde_json::from_str(r#"{"page": 3}"#).unwrap();
        assert_eq!(from_number.page, 3);

        let from_text: PageQuery = serde_json::from_str(r#"{"page": "7"}"#).unwrap();
        assert_eq!(from_text.page, 7);
    }

    #[test]
    fn page_defaults_to_first() {
        let query: PageQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.page, 1);
    }

    #[test]
    fn garbage_page_is_rejected() {
        assert!(serde_json::from_str::<PageQuery>(r#"{"page": "abc"}"#).is_err());
    }
}
