use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::PasswordHash;
use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Credential hashing shared with the auth service
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    /// Hash on the blocking pool.
    async fn hash_password(&self, password: String) -> Result<PasswordHash, UserError> {
        if password.is_empty() {
            return Err(UserError::EmptyPassword);
        }

        let authenticator = Arc::clone(&self.authenticator);
        let hash = tokio::task::spawn_blocking(move || authenticator.hash_password(&password))
            .await
            .map_err(|e| UserError::Unknown(format!("Password hashing task failed: {}", e)))??;

        Ok(PasswordHash::new(hash))
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        let password_hash = self.hash_password(command.password).await?;

        let new_user = NewUser {
            name: command.name,
            email: command.email,
            password_hash,
            role: Role::default(),
        };

        let created_user = self.repository.create(new_user).await?;
        tracing::info!(user_id = %created_user.id, "User created");

        Ok(created_user)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn get_user_by_email(&self, email: &EmailAddress) -> Result<User, UserError> {
        self.repository
            .find_by_email(email)
            .await?
            .ok_or(UserError::NotFoundByEmail(email.to_string()))
    }

    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        self.repository.list_all().await
    }

    async fn update_password(
        &self,
        id: &UserId,
        new_password: String,
    ) -> Result<User, UserError> {
        let password_hash = self.hash_password(new_password).await?;

        let updated_user = self.repository.update_password(id, &password_hash).await?;
        tracing::info!(user_id = %id, "User password updated");

        Ok(updated_user)
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        self.repository.delete(id).await?;
        tracing::info!(user_id = %id, "User deleted");

        Ok(())
    }

    async fn check_password(&self, id: &UserId, password: String) -> Result<bool, UserError> {
        let Some(user) = self.repository.find_by_id(id).await? else {
            tracing::warn!(user_id = %id, "Password check for unknown user");
            return Ok(false);
        };

        let authenticator = Arc::clone(&self.authenticator);
        let stored_hash = user.password_hash;
        let is_valid = tokio::task::spawn_blocking(move || {
            authenticator.verify_password(&password, stored_hash.as_str())
        })
        .await
        .map_err(|e| UserError::Unknown(format!("Password verification task failed: {}", e)))?;

        if !is_valid {
            tracing::warn!(user_id = %id, "Password check failed");
        }

        Ok(is_valid)
    }
}

#[cfg(test)]
mod tests {
    use auth::KeyRing;
    use auth::PasswordHasher;
    use auth::TokenLifetimes;
    use chrono::Utc;
    use mockall::mock;

    use super::*;
    use crate::domain::user::models::UserName;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: NewUser) -> Result<User, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;
            async fn list_all(&self) -> Result<Vec<User>, UserError>;
            async fn update_password(&self, id: &UserId, password_hash: &PasswordHash) -> Result<User, UserError>;
            async fn delete(&self, id: &UserId) -> Result<(), UserError>;
        }
    }

    fn authenticator() -> Arc<Authenticator> {
        let keys = KeyRing::new("v1", b"test-secret-key-for-jwt-signing-at-least-32-bytes")
            .expect("Failed to create key ring");
        Arc::new(Authenticator::new(keys, TokenLifetimes::default()))
    }

    fn stored_user(id: i64, email: &str, password_hash: &str) -> User {
        User {
            id: UserId(id),
            name: UserName::new("Test User".to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: PasswordHash::new(password_hash.to_string()),
            role: Role::default(),
            created_at: Utc::now(),
        }
    }

    fn persisted(id: i64, user: NewUser) -> User {
        User {
            id: UserId(id),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_user_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_create()
            .withf(|user| {
                user.name.as_str() == "Test User"
                    && user.email.as_str() == "test@example.com"
                    && user.password_hash.as_str().starts_with("$argon2id$")
                    && user.role.as_str() == "user"
            })
            .times(1)
            .returning(|user| Ok(persisted(1, user)));

        let authenticator = authenticator();
        let service = UserService::new(Arc::new(repository), Arc::clone(&authenticator));

        let command = CreateUserCommand::new(
            UserName::new("Test User".to_string()).unwrap(),
            EmailAddress::new("test@example.com".to_string()).unwrap(),
            "password123".to_string(),
        );

        let user = service.create_user(command).await.expect("Failed to create user");
        assert_eq!(user.id, UserId(1));
        assert_eq!(user.email.as_str(), "test@example.com");
        assert_eq!(user.role.as_str(), "user");
        // Stored credential is a hash, never the plaintext
        assert_ne!(user.password_hash.as_str(), "password123");
        assert!(authenticator.verify_password("password123", user.password_hash.as_str()));
    }

    #[tokio::test]
    async fn test_create_user_empty_password() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_create().times(0);

        let service = UserService::new(Arc::new(repository), authenticator());

        let command = CreateUserCommand::new(
            UserName::new("Test User".to_string()).unwrap(),
            EmailAddress::new("test@example.com".to_string()).unwrap(),
            String::new(),
        );

        let result = service.create_user(command).await;
        assert!(matches!(result, Err(UserError::EmptyPassword)));
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email() {
        let mut repository = MockTestUserRepository::new();

        repository.expect_create().times(1).returning(|user| {
            Err(UserError::EmailAlreadyExists(
                user.email.as_str().to_string(),
            ))
        });

        let service = UserService::new(Arc::new(repository), authenticator());

        let command = CreateUserCommand::new(
            UserName::new("Other".to_string()).unwrap(),
            EmailAddress::new("test@example.com".to_string()).unwrap(),
            "password456".to_string(),
        );

        let result = service.create_user(command).await;
        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_get_user_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_id()
            .withf(|id| *id == UserId(7))
            .times(1)
            .returning(|_| Ok(Some(stored_user(7, "test@example.com", "$argon2id$hash"))));

        let service = UserService::new(Arc::new(repository), authenticator());

        let user = service.get_user(&UserId(7)).await.expect("Failed to get user");
        assert_eq!(user.id, UserId(7));
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository), authenticator());

        let result = service.get_user(&UserId(99)).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_user_by_email_not_found() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository), authenticator());

        let email = EmailAddress::new("nobody@example.com".to_string()).unwrap();
        let result = service.get_user_by_email(&email).await;
        assert!(matches!(result, Err(UserError::NotFoundByEmail(_))));
    }

    #[tokio::test]
    async fn test_update_password_stores_new_hash() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_update_password()
            .withf(|id, hash| {
                *id == UserId(3)
                    && hash.as_str().starts_with("$argon2id$")
                    && PasswordHasher::new().verify("new-password", hash.as_str())
            })
            .times(1)
            .returning(|id, hash| {
                let mut user = stored_user(id.0, "test@example.com", "");
                user.password_hash = hash.clone();
                Ok(user)
            });

        let service = UserService::new(Arc::new(repository), authenticator());

        let user = service
            .update_password(&UserId(3), "new-password".to_string())
            .await
            .expect("Failed to update password");
        assert!(PasswordHasher::new().verify("new-password", user.password_hash.as_str()));
    }

    #[tokio::test]
    async fn test_update_password_not_found() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_update_password()
            .times(1)
            .returning(|id, _| Err(UserError::NotFound(id.to_string())));

        let service = UserService::new(Arc::new(repository), authenticator());

        let result = service
            .update_password(&UserId(3), "new-password".to_string())
            .await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_user_not_found() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_delete()
            .times(1)
            .returning(|id| Err(UserError::NotFound(id.to_string())));

        let service = UserService::new(Arc::new(repository), authenticator());

        let result = service.delete_user(&UserId(5)).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_check_password() {
        let hash = PasswordHasher::new().hash("secret1").unwrap();
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_id()
            .times(2)
            .returning(move |id| Ok(Some(stored_user(id.0, "a@b.com", &hash))));

        let service = UserService::new(Arc::new(repository), authenticator());

        assert!(service
            .check_password(&UserId(1), "secret1".to_string())
            .await
            .unwrap());
        assert!(!service
            .check_password(&UserId(1), "wrong".to_string())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_check_password_unknown_user() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository), authenticator());

        let result = service
            .check_password(&UserId(1), "secret1".to_string())
            .await;
        assert!(matches!(result, Ok(false)));
    }
}
