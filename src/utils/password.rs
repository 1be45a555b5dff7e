use crate::config::{AppConfig, Argon2Config};
use crate::errors::GymSystemError;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};

fn build_hasher(cfg: &Argon2Config) -> Result<Argon2<'static>, GymSystemError> {
    let params = Params::new(cfg.memory_cost, cfg.time_cost, cfg.parallelism, None)
        .map_err(|e| GymSystemError::validation(format!("Argon2 参数错误: {e}")))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

fn hash_with(cfg: &Argon2Config, password: &str) -> Result<String, GymSystemError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = build_hasher(cfg)?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| GymSystemError::validation(format!("密码哈希失败: {e}")))?;
    Ok(hash.to_string())
}

/// 用全局配置里的 Argon2 参数哈希密码
pub fn hash_password(password: &str) -> Result<String, GymSystemError> {
    hash_with(&AppConfig::get().argon2, password)
}

/// 验证密码，哈希串不合法时按不匹配处理
pub fn verify_password(password: &str, hash: &str) -> bool {
    // 验证参数以哈希串里记录的为准，不依赖当前配置
    match PasswordHash::new(hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_params() -> Argon2Config {
        // 测试用的小参数，只为跑得快
        Argon2Config {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn hash_then_verify_roundtrip() {
        let hash = hash_with(&test_params(), "s3cret!").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("s3cret!", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn malformed_hash_rejected() {
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("anything", ""));
    }
}
