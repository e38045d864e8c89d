use serde::{Deserialize, Serialize};

/// API 错误代码
///
/// 数字分段与 HTTP 状态对应：40xxx 客户端错误，50xxx 服务端错误。
/// 响应体中以 `code` 字段返回，便于前端做机器判断。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 400 请求错误
    BadRequest = 40000,
    ValidationFailed = 40001,
    TaskNotPublished = 40002,
    ScoreOutOfRange = 40003,
    InvalidState = 40004,

    // 401 / 403 认证与授权
    Unauthorized = 40100,
    Forbidden = 40300,
    NotAssigned = 40301,

    // 404 资源不存在
    NotFound = 40400,
    UserNotFound = 40401,
    TaskNotFound = 40402,
    SubmissionNotFound = 40403,

    // 409 冲突
    SubmissionAlreadyExists = 40900,

    // 500 服务端错误
    InternalServerError = 50000,
}
