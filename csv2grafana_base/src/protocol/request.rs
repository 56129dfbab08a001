use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use serde_json::Value;

use crate::custom_error::{invalid_request_err, CustomResult};
use crate::series::TimeWindow;

/// 查询目标，按 `type` 区分，未知类型在反序列化时报错
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Target {
    Timeserie {
        #[serde(default)]
        target: String,
    },
    Table {
        #[serde(default)]
        target: String,
    },
}

/// 时间边界，面板发送 RFC 3339 字符串；也接受毫秒数和只有日期的 ISO 字符串
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum TimeBound {
    Millis(f64),
    Text(String),
    Other(Value),
}

impl TimeBound {
    /// 无法识别的值返回 None，等同于没有这个边界
    pub fn to_millis(&self) -> Option<f64> {
        match self {
            TimeBound::Millis(v) if v.is_finite() => Some(*v),
            TimeBound::Text(s) => parse_date_millis(s.trim()),
            _ => None,
        }
    }
}

/// `YYYY-MM-DDTHH:MM:SS[.sss](Z|±HH:MM)`，或只有日期的 `YYYY-MM-DD`、`YYYY-MM`、`YYYY`（按 UTC 零点）
fn parse_date_millis(s: &str) -> Option<f64> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.timestamp_millis() as f64);
    }

    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d").ok())
        .or_else(|| {
            if s.len() == 4 && s.bytes().all(|c| c.is_ascii_digit()) {
                s.parse::<i32>().ok().and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1))
            } else {
                None
            }
        })?;
    date.and_hms_opt(0, 0, 0)
        .map(|t| t.and_utc().timestamp_millis() as f64)
}

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Range {
    #[serde(default)]
    pub from: Option<TimeBound>,
    #[serde(default)]
    pub to: Option<TimeBound>,
}

/// query 请求体，面板发送的其它字段（interval、maxDataPoints 等）忽略
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct QueryRequest {
    #[serde(default)]
    pub range: Option<Range>,
    #[serde(default)]
    pub targets: Option<Vec<Target>>,
}

impl QueryRequest {
    /// 空请求体视为 `{}`
    pub fn from_slice(body: &[u8]) -> CustomResult<QueryRequest> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(QueryRequest::default());
        }
        serde_json::from_slice(body).map_err(|e| invalid_request_err(format!("请求体不合法:{}", e)))
    }

    pub fn targets(&self) -> &[Target] {
        self.targets.as_deref().unwrap_or(&[])
    }

    pub fn window(&self) -> TimeWindow {
        match &self.range {
            None => TimeWindow::default(),
            Some(range) => TimeWindow {
                from: range.from.as_ref().and_then(TimeBound::to_millis),
                to: range.to.as_ref().and_then(TimeBound::to_millis),
            },
        }
    }
}
