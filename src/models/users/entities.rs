use serde::{Deserialize, Serialize};

// 用户角色
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Professor, // 教师
    Student,   // 学生
}

impl UserRole {
    pub const PROFESSOR: &'static str = "professor";
    pub const STUDENT: &'static str = "student";

    pub fn professor_roles() -> &'static [&'static UserRole] {
        &[&Self::Professor]
    }
    pub fn all_roles() -> &'static [&'static UserRole] {
        &[&Self::Professor, &Self::Student]
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            UserRole::PROFESSOR => Ok(UserRole::Professor),
            UserRole::STUDENT => Ok(UserRole::Student),
            _ => Err(serde::de::Error::custom(format!(
                "无效的用户角色: '{s}'. 支持的角色: professor, student"
            ))),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Professor => write!(f, "{}", UserRole::PROFESSOR),
            UserRole::Student => write!(f, "{}", UserRole::STUDENT),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "professor" => Ok(UserRole::Professor),
            "student" => Ok(UserRole::Student),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

// 用户实体
//
// 凭证（密码、令牌签发）由外部身份服务管理，本服务只读取用户记录。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
