use std::error;
use std::fmt;
use std::io;
use std::path::Path;

pub type CustomResult<T> = std::result::Result<T, CustomError>;

#[derive(Debug)]
pub struct CustomError {
    pub code: usize,
    pub message: String,
}

impl CustomError {
    /// 文件、描述文件或查询目标不存在，对外统一表现为 not found
    pub fn is_not_found(&self) -> bool {
        self.code == FILE_NOT_FOUND_CODE
            || self.code == EMPTY_SCHEMA_CODE
            || self.code == MALFORMED_QUERY_CODE
    }

    /// 请求本身非法
    pub fn is_invalid_request(&self) -> bool {
        self.code == INVALID_REQUEST_CODE
    }

    pub fn class(&self) -> &'static str {
        match self.code {
            c if c == FILE_NOT_FOUND_CODE => "NotFound",
            c if c == EMPTY_SCHEMA_CODE => "EmptySchema",
            c if c == MALFORMED_QUERY_CODE => "MalformedQuery",
            c if c == INVALID_REQUEST_CODE => "InvalidRequest",
            c if c == IO_CODE => "Io",
            c if c == JSON_CODE => "Json",
            c if c == MALFORMED_FIELD_CODE => "MalformedField",
            _ => "Unknown",
        }
    }
}

/// 读写 csv 或描述文件时的底层错误，不存在的文件由 store 单独转换成 not found
impl From<io::Error> for CustomError {
    fn from(e: io::Error) -> Self {
        CustomError {
            code: IO_CODE,
            message: format!("文件读写失败({:?}):{}", e.kind(), e),
        }
    }
}

/// 描述文件或配置文件不是合法的 json
impl From<serde_json::Error> for CustomError {
    fn from(e: serde_json::Error) -> Self {
        CustomError {
            code: JSON_CODE,
            message: format!("json解析失败({:?})，第{}行第{}列", e.classify(), e.line(), e.column()),
        }
    }
}

impl fmt::Display for CustomError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}[{}]:{}", self.class(), self.code, self.message)
    }
}

impl error::Error for CustomError {}

pub static FILE_NOT_FOUND_CODE: usize = 10001;
pub static EMPTY_SCHEMA_CODE: usize = 10002;
pub static MALFORMED_QUERY_CODE: usize = 10003;
pub static INVALID_REQUEST_CODE: usize = 10004;
pub static IO_CODE: usize = 10005;
pub static JSON_CODE: usize = 10006;
/// 严格解析模式下，字段不是数字
pub static MALFORMED_FIELD_CODE: usize = 20001;

pub fn file_not_found_err(path: &Path) -> CustomError {
    CustomError {
        code: FILE_NOT_FOUND_CODE,
        message: format!("文件不存在:{}", path.display()),
    }
}

pub fn empty_schema_err(path: &Path) -> CustomError {
    CustomError {
        code: EMPTY_SCHEMA_CODE,
        message: format!("无法推断列数，文件为空:{}", path.display()),
    }
}

pub fn malformed_query_err(msg: &str) -> CustomError {
    CustomError {
        code: MALFORMED_QUERY_CODE,
        message: format!("查询不合法:{}", msg),
    }
}

pub fn invalid_request_err(msg: String) -> CustomError {
    CustomError {
        code: INVALID_REQUEST_CODE,
        message: msg,
    }
}

pub fn malformed_field_err(line: usize, column: usize, field: &str) -> CustomError {
    CustomError {
        code: MALFORMED_FIELD_CODE,
        message: format!("第{}行第{}列不是数字:{:?}", line, column, field),
    }
}
