use crate::error::AppError;
use bcrypt::{hash, verify};

/// Hashes a password on the blocking pool; bcrypt is deliberately slow.
pub async fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(password, cost)).await??;
    Ok(hashed)
}

/// Returns `Ok(false)` for a wrong password and an error only when the stored
/// hash itself is unusable.
pub async fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let hashed_password = hashed_password.to_owned();
    let matches =
        tokio::task::spawn_blocking(move || verify(password, &hashed_password)).await??;
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_rt::test]
    async fn test_password_hashing_and_verification() {
        let password = "test_password123";
        let hashed = hash_password(password, 4).await.unwrap();

        assert_ne!(hashed, password);
        assert!(verify_password(password, &hashed).await.unwrap());
        assert!(!verify_password("wrong_password", &hashed).await.unwrap());
    }

    #[actix_rt::test]
    async fn test_verify_with_invalid_hash() {
        match verify_password("test_password123", "invalidhashformat").await {
            Err(AppError::Internal(msg)) => assert!(msg.contains("password hashing failed")),
            Ok(false) => {}
            Ok(true) => panic!("Password verification should fail for invalid hash format"),
            Err(e) => panic!("Unexpected error: {:?}", e),
        }
    }

    #[actix_rt::test]
    async fn test_invalid_cost_is_an_error() {
        assert!(matches!(
            hash_password("secret1", 2).await,
            Err(AppError::Internal(_))
        ));
    }
}
