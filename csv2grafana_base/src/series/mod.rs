use std::collections::BTreeMap;

use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};

use crate::ds::column::{DatasetDescriptor, TIMESTAMP_INDEX};
use crate::ds::Dataset;

/// 数据点，序列化为 `[value, timestamp]`。
/// 行里没有描述文件指定的列时 value 为空，序列化为 null。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataPoint {
    pub value: Option<f64>,
    pub timestamp: f64,
}

impl Serialize for DataPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.value.map(JsonNumber))?;
        tuple.serialize_element(&JsonNumber(self.timestamp))?;
        tuple.end()
    }
}

/// 整数值输出为 `1000` 而不是 `1000.0`
struct JsonNumber(f64);

impl Serialize for JsonNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let v = self.0;
        if v.fract() == 0.0 && v.abs() < MAX_SAFE_INTEGER {
            serializer.serialize_i64(v as i64)
        } else {
            serializer.serialize_f64(v)
        }
    }
}

const MAX_SAFE_INTEGER: f64 = 9007199254740992.0;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TimeSeries {
    pub target: String,
    pub datapoints: Vec<DataPoint>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TableColumnType {
    Time,
    String,
    Number,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TableColumn {
    pub text: String,
    #[serde(rename = "type")]
    pub column_type: TableColumnType,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum TableCell {
    Number(f64),
    Text(String),
}

/// 表格结果，目前查询不会生成
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TableResult {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<TableCell>>,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl TableResult {
    pub fn new(columns: Vec<TableColumn>) -> TableResult {
        TableResult {
            columns,
            rows: Vec::new(),
            kind: "table",
        }
    }
}

/// 查询时间范围，两端都包含
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimeWindow {
    pub from: Option<f64>,
    pub to: Option<f64>,
}

impl TimeWindow {
    pub fn contains(&self, timestamp: f64) -> bool {
        self.from.map_or(true, |from| from <= timestamp)
            && self.to.map_or(true, |to| timestamp <= to)
    }
}

/// 按列切分数据，key 是列的 index，不包含时间戳列
pub fn project(
    descr: &DatasetDescriptor,
    dataset: &Dataset,
    window: &TimeWindow,
) -> BTreeMap<usize, Vec<DataPoint>> {
    let mut points: BTreeMap<usize, Vec<DataPoint>> = descr
        .columns
        .iter()
        .filter(|c| c.index != TIMESTAMP_INDEX)
        .map(|c| (c.index, Vec::new()))
        .collect();

    for row in dataset {
        let timestamp = match row.get(TIMESTAMP_INDEX) {
            Some(ts) => *ts,
            None => continue,
        };
        if !window.contains(timestamp) {
            continue;
        }
        for (index, series) in points.iter_mut() {
            series.push(DataPoint {
                value: row.get(*index).copied(),
                timestamp,
            });
        }
    }
    points
}
