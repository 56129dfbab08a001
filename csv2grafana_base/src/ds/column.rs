use serde::{Deserialize, Serialize};

/// 第 0 列固定是时间戳
pub const TIMESTAMP_INDEX: usize = 0;
pub const TIMESTAMP_NAME: &str = "Timestamp";

/// 单列描述
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub index: usize,
    pub name: String,
}

impl ColumnDescriptor {
    /// 推断时使用的默认列名
    pub fn with_default_name(index: usize) -> ColumnDescriptor {
        let name = if index == TIMESTAMP_INDEX {
            TIMESTAMP_NAME.to_string()
        } else {
            format!("Column {}", index)
        };
        ColumnDescriptor { index, name }
    }

    pub fn is_timestamp(&self) -> bool {
        self.index == TIMESTAMP_INDEX
    }
}

/// csv 文件的列描述，落盘在 `<file>.descr.json`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DatasetDescriptor {
    pub columns: Vec<ColumnDescriptor>,
}

impl DatasetDescriptor {
    pub fn with_column_count(count: usize) -> DatasetDescriptor {
        DatasetDescriptor {
            columns: (0..count).map(ColumnDescriptor::with_default_name).collect(),
        }
    }

    /// 除时间戳外的列，按 index 升序
    pub fn value_columns(&self) -> Vec<&ColumnDescriptor> {
        let mut columns: Vec<&ColumnDescriptor> =
            self.columns.iter().filter(|c| !c.is_timestamp()).collect();
        columns.sort_by_key(|c| c.index);
        columns
    }

    /// 按名称查找非时间戳列
    pub fn find_value_column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns
            .iter()
            .find(|c| !c.is_timestamp() && c.name == name)
    }
}
