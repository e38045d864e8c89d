use serde::{Deserialize, Serialize};

/// 附件元数据
///
/// 文件字节由外部文件服务存储；这里只记录元数据，附加后不可变，
/// 始终归属于某个任务或提交，不能单独寻址。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    pub original_name: String,
    pub path: String,
    pub size: i64,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}

/// 附件上传结果（外部文件服务返回的引用，作为请求体的一部分）
#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentUpload {
    pub filename: String,
    pub original_name: String,
    pub path: String,
    pub size: i64,
}

impl AttachmentUpload {
    pub fn into_attachment(self) -> Attachment {
        Attachment {
            filename: self.filename,
            original_name: self.original_name,
            path: self.path,
            size: self.size,
            uploaded_at: chrono::Utc::now(),
        }
    }
}
