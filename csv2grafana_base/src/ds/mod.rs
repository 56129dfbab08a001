use std::path::Path;

use crate::custom_error::{malformed_field_err, CustomResult};
use crate::store;

pub mod column;
pub mod descriptor;

/// 一行数据，第 0 个元素是毫秒时间戳
pub type DataRow = Vec<f64>;

/// 按文件顺序排列的所有行
pub type Dataset = Vec<DataRow>;

/// 数字解析策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParsePolicy {
    /// 无法解析的字段（包括空字段）按 0 处理
    #[default]
    Lossy,
    /// 遇到无法解析的字段直接报错
    Strict,
}

/// 读取字段开头最长的合法数字，返回数值和占用的字节数。
/// 语法：`[+-](Infinity | digits[.digits][(e|E)[+-]digits])`，整数和小数部分至少有一位数字。
fn parse_number_prefix(s: &str) -> Option<(f64, usize)> {
    let b = s.as_bytes();
    let mut i = 0;
    let negative = b.first() == Some(&b'-');
    if negative || b.first() == Some(&b'+') {
        i += 1;
    }
    if s[i..].starts_with(INFINITY) {
        let v = if negative { f64::NEG_INFINITY } else { f64::INFINITY };
        return Some((v, i + INFINITY.len()));
    }

    let int_start = i;
    i = skip_digits(b, i);
    let mut digits = i - int_start;
    if b.get(i) == Some(&b'.') {
        let frac_end = skip_digits(b, i + 1);
        if digits > 0 || frac_end > i + 1 {
            digits += frac_end - (i + 1);
            i = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(b.get(i), Some(b'e') | Some(b'E')) {
        let mut j = i + 1;
        if matches!(b.get(j), Some(b'+') | Some(b'-')) {
            j += 1;
        }
        let exp_end = skip_digits(b, j);
        if exp_end > j {
            i = exp_end;
        }
    }

    s[..i].parse::<f64>().ok().map(|v| (v, i))
}

const INFINITY: &str = "Infinity";

fn skip_digits(b: &[u8], mut i: usize) -> usize {
    while b.get(i).map_or(false, u8::is_ascii_digit) {
        i += 1;
    }
    i
}

/// 取字段开头的数字（`25.3C` 得到 25.3），开头不是数字时返回 0
pub fn lossy_parse(field: &str) -> f64 {
    parse_number_prefix(field.trim_start()).map_or(0.0, |(v, _)| v)
}

/// 整个字段必须是一个数字
fn strict_parse(field: &str, line: usize, column: usize) -> CustomResult<f64> {
    let trimmed = field.trim();
    match parse_number_prefix(trimmed) {
        Some((v, len)) if len == trimmed.len() => Ok(v),
        _ => Err(malformed_field_err(line, column, field)),
    }
}

/// 解析 csv 内容，没有表头，空行跳过。
/// 严格模式下的行号、列号都从 1 开始，行号按原文件计算。
pub fn parse_dataset(content: &str, policy: ParsePolicy) -> CustomResult<Dataset> {
    let mut rows = Vec::new();
    for (line_no, line) in content.split('\n').enumerate() {
        if line.is_empty() {
            continue;
        }
        let row: DataRow = match policy {
            ParsePolicy::Lossy => line.split(',').map(lossy_parse).collect(),
            ParsePolicy::Strict => line
                .split(',')
                .enumerate()
                .map(|(i, field)| strict_parse(field, line_no + 1, i + 1))
                .collect::<CustomResult<DataRow>>()?,
        };
        rows.push(row);
    }
    Ok(rows)
}

/// 读取并解析 csv 文件
pub async fn load(path: &Path, policy: ParsePolicy) -> CustomResult<Dataset> {
    let content = store::read_to_string(path).await?;
    parse_dataset(&content, policy)
}
