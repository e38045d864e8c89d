use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

// JWT Claims 结构体
//
// 令牌由外部身份服务签发，本服务只做验证与解码。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // Subject (user ID)
    pub role: String,       // 用户角色
    pub token_type: String, // token类型: "access"
    pub exp: usize,         // Expiration time (时间戳)
    pub iat: usize,         // Issued at (签发时间)
}

pub struct JwtUtils;

impl JwtUtils {
    // 获取 JWT 密钥（与身份服务共享）
    fn get_secret() -> String {
        AppConfig::get().jwt.secret.clone()
    }

    // 生成 Access Token（与身份服务同构；服务自身只在测试中使用）
    pub fn generate_access_token(
        user_id: i64,
        role: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let config = AppConfig::get();
        let now = chrono::Utc::now();
        let expiration = now + chrono::Duration::minutes(config.jwt.access_token_expiry);

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            token_type: "access".to_string(),
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let secret = Self::get_secret();
        let encoding_key = EncodingKey::from_secret(secret.as_ref());

        encode(&Header::default(), &claims, &encoding_key)
    }

    // 验证 JWT token
    pub fn verify_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let secret = Self::get_secret();
        let decoding_key = DecodingKey::from_secret(secret.as_ref());
        let validation = Validation::default();

        decode::<Claims>(token, &decoding_key, &validation).map(|token_data| token_data.claims)
    }

    // 验证 Access Token
    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let claims = Self::verify_token(token)?;
        if claims.token_type != "access" {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }
        Ok(claims)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_verify_round_trip() {
        let token = JwtUtils::generate_access_token(42, "professor").unwrap();
        let claims = JwtUtils::verify_access_token(&token).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role, "professor");
        assert_eq!(claims.token_type, "access");
    }

    #[test]
    fn test_non_access_token_rejected() {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: "42".to_string(),
            role: "student".to_string(),
            token_type: "refresh".to_string(),
            exp: (now + chrono::Duration::minutes(5)).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        let secret = AppConfig::get().jwt.secret.clone();
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
        .unwrap();

        assert!(JwtUtils::verify_access_token(&token).is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let token = JwtUtils::generate_access_token(42, "student").unwrap();
        let mut tampered = token.clone();
        tampered.push('x');

        assert!(JwtUtils::verify_access_token(&tampered).is_err());
    }
}
