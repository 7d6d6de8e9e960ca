//! 序列化辅助模块

/// 宽松的日期字段
///
/// 后端有时返回纯日期 `2020-05-01`，有时返回完整时间戳
/// `2020-05-01T00:00:00.000Z`。反序列化时两种都接受，只保留日期部分；
/// 序列化时统一输出 `YYYY-MM-DD`。
pub mod lenient_date {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse))
    }

    /// 解析失败时返回 None，而不是让整条记录反序列化失败
    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        NaiveDate::parse_from_str(raw, FORMAT)
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
            .or_else(|| raw.get(..10).and_then(|d| NaiveDate::parse_from_str(d, FORMAT).ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::lenient_date::parse;
    use chrono::NaiveDate;

    #[test]
    fn parses_plain_and_timestamp_dates() {
        let expected = NaiveDate::from_ymd_opt(2021, 7, 9);
        assert_eq!(parse("2021-07-09"), expected);
        assert_eq!(parse("2021-07-09T00:00:00.000Z"), expected);
        assert_eq!(parse("2021-07-09T12:00:00"), expected);
        assert_eq!(parse(""), None);
        assert_eq!(parse("not a date"), None);
    }
}
