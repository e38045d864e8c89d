//! 字段校验
//!
//! 每个操作做一次完整校验，返回所有违规字段，而不是逐字段提前返回。
//! 长度与范围限制沿用数据模型约束。

pub const TITLE_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 1000;
pub const INSTRUCTIONS_MAX_LEN: usize = 2000;
pub const CONTENT_MAX_LEN: usize = 5000;
pub const FEEDBACK_MAX_LEN: usize = 2000;
pub const MAX_SCORE_LIMIT: f64 = 1000.0;
pub const MAX_ATTACHMENTS_PER_UPDATE: usize = 5;

/// 校验结果：收集全部违规项
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub errors: Vec<&'static str>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

fn check_title(title: &str, errors: &mut Vec<&'static str>) {
    if title.trim().is_empty() {
        errors.push("Title is required");
    } else if title.chars().count() > TITLE_MAX_LEN {
        errors.push("Title cannot be more than 100 characters");
    }
}

fn check_description(description: &str, errors: &mut Vec<&'static str>) {
    if description.trim().is_empty() {
        errors.push("Description is required");
    } else if description.chars().count() > DESCRIPTION_MAX_LEN {
        errors.push("Description cannot be more than 1000 characters");
    }
}

fn check_max_score(max_score: f64, errors: &mut Vec<&'static str>) {
    if max_score < 0.0 {
        errors.push("Max score cannot be negative");
    } else if max_score > MAX_SCORE_LIMIT {
        errors.push("Max score cannot exceed 1000");
    }
}

fn check_instructions(instructions: &str, errors: &mut Vec<&'static str>) {
    if instructions.chars().count() > INSTRUCTIONS_MAX_LEN {
        errors.push("Instructions cannot be more than 2000 characters");
    }
}

fn check_content(content: &str, errors: &mut Vec<&'static str>) {
    if content.chars().count() > CONTENT_MAX_LEN {
        errors.push("Content cannot be more than 5000 characters");
    }
}

/// 创建任务字段校验
pub fn validate_create_task(
    title: &str,
    description: &str,
    max_score: f64,
    instructions: Option<&str>,
) -> ValidationResult {
    let mut errors = Vec::new();
    check_title(title, &mut errors);
    check_description(description, &mut errors);
    check_max_score(max_score, &mut errors);
    if let Some(instructions) = instructions {
        check_instructions(instructions, &mut errors);
    }
    ValidationResult { errors }
}

/// 更新任务字段校验（只校验出现的字段）
pub fn validate_update_task(
    title: Option<&str>,
    description: Option<&str>,
    max_score: Option<f64>,
    instructions: Option<&str>,
    attachment_count: usize,
) -> ValidationResult {
    let mut errors = Vec::new();
    if let Some(title) = title {
        check_title(title, &mut errors);
    }
    if let Some(description) = description {
        check_description(description, &mut errors);
    }
    if let Some(max_score) = max_score {
        check_max_score(max_score, &mut errors);
    }
    if let Some(instructions) = instructions {
        check_instructions(instructions, &mut errors);
    }
    if attachment_count > MAX_ATTACHMENTS_PER_UPDATE {
        errors.push("Cannot attach more than 5 files at once");
    }
    ValidationResult { errors }
}

/// 创建提交字段校验：附件必填（文件本体由外部服务校验类型与大小）
pub fn validate_create_submission(content: Option<&str>, has_attachment: bool) -> ValidationResult {
    let mut errors = Vec::new();
    if !has_attachment {
        errors.push("File is required");
    }
    if let Some(content) = content {
        check_content(content, &mut errors);
    }
    ValidationResult { errors }
}

/// 更新提交字段校验
pub fn validate_update_submission(
    content: Option<&str>,
    attachment_count: usize,
) -> ValidationResult {
    let mut errors = Vec::new();
    if let Some(content) = content {
        check_content(content, &mut errors);
    }
    if attachment_count > MAX_ATTACHMENTS_PER_UPDATE {
        errors.push("Cannot attach more than 5 files at once");
    }
    ValidationResult { errors }
}

/// 评分反馈校验
pub fn validate_feedback(feedback: Option<&str>) -> ValidationResult {
    let mut errors = Vec::new();
    if let Some(feedback) = feedback
        && feedback.chars().count() > FEEDBACK_MAX_LEN
    {
        errors.push("Feedback cannot be more than 2000 characters");
    }
    ValidationResult { errors }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_create_task() {
        let result = validate_create_task("Essay", "Write an essay", 100.0, None);
        assert!(result.is_valid());
    }

    #[test]
    fn test_create_task_collects_all_errors() {
        let long_title = "t".repeat(101);
        let result = validate_create_task(&long_title, "", 1001.0, None);
        assert!(!result.is_valid());
        // 一次校验返回全部违规字段
        assert_eq!(result.errors.len(), 3);
        let msg = result.error_message();
        assert!(msg.contains("Title"));
        assert!(msg.contains("Description"));
        assert!(msg.contains("Max score"));
    }

    #[test]
    fn test_max_score_bounds() {
        assert!(validate_create_task("t", "d", 0.0, None).is_valid());
        assert!(validate_create_task("t", "d", 1000.0, None).is_valid());
        assert!(!validate_create_task("t", "d", -1.0, None).is_valid());
        assert!(!validate_create_task("t", "d", 1000.5, None).is_valid());
    }

    #[test]
    fn test_update_task_skips_absent_fields() {
        let result = validate_update_task(None, None, None, None, 0);
        assert!(result.is_valid());

        let result = validate_update_task(Some(""), None, Some(2000.0), None, 6);
        assert_eq!(result.errors.len(), 3);
    }

    #[test]
    fn test_create_submission_requires_attachment() {
        let result = validate_create_submission(Some("my work"), false);
        assert!(!result.is_valid());
        assert!(result.error_message().contains("File is required"));

        assert!(validate_create_submission(None, true).is_valid());
    }

    #[test]
    fn test_content_length_limit() {
        let long_content = "c".repeat(5001);
        assert!(!validate_create_submission(Some(&long_content), true).is_valid());
        assert!(!validate_update_submission(Some(&long_content), 1).is_valid());
    }

    #[test]
    fn test_update_submission_attachment_limit() {
        assert!(validate_update_submission(None, 5).is_valid());
        assert!(!validate_update_submission(None, 6).is_valid());
    }

    #[test]
    fn test_feedback_length() {
        assert!(validate_feedback(None).is_valid());
        assert!(validate_feedback(Some("good work")).is_valid());
        let long = "f".repeat(2001);
        assert!(!validate_feedback(Some(&long)).is_valid());
    }
}
