//! Account service
//!
//! Registration, authentication and admin user management. Password hashing
//! is delegated to a [`CredentialHasher`].

use std::sync::Arc;

use tracing::{info, instrument, warn};

use core_kernel::UserId;
use domain_identity::{
    validate_registration, Actor, Capability, CredentialHasher, IdentityError, NewUser, User,
    UserRole,
};

use crate::access::require;
use crate::error::LifecycleError;
use crate::ports::{InsuranceStore, Page};

/// Credentials for the administrator created at startup
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
}

impl Default for AdminBootstrap {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            email: "admin@acp-health.com".to_string(),
            password: "Admin@123456".to_string(),
            full_name: "System Administrator".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn InsuranceStore>,
    hasher: Arc<dyn CredentialHasher>,
}

impl AccountService {
    pub fn new(store: Arc<dyn InsuranceStore>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { store, hasher }
    }

    /// Creates an account
    ///
    /// `caller` is `None` for self-registration, which may only request the
    /// customer or provider role. An admin caller may grant any role.
    ///
    /// # Errors
    ///
    /// * `Validation` - malformed email, username or password
    /// * `Forbidden` - role not available to the caller
    /// * `Conflict` - email or username already registered
    #[instrument(skip(self, caller, input), fields(username = %input.username))]
    pub async fn register(
        &self,
        caller: Option<&Actor>,
        input: NewUser,
    ) -> Result<User, LifecycleError> {
        let role = validate_registration(&input, caller.map(|a| a.role))?;

        let mut tx = self.store.begin().await?;
        let email = input.email.trim().to_lowercase();
        if tx.find_user_by_email(&email).await?.is_some() {
            return Err(IdentityError::DuplicateEmail(email).into());
        }
        let username = input.username.trim();
        if tx.find_user_by_username(username).await?.is_some() {
            return Err(IdentityError::DuplicateUsername(username.to_string()).into());
        }

        let hash = self.hasher.hash(&input.password)?;
        let user = User::new(&input, role, hash);
        tx.insert_user(&user).await?;
        tx.commit().await?;

        info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    /// Checks a username and password
    ///
    /// Unknown user, wrong password and inactive account all fail with
    /// `Unauthorized`.
    #[instrument(skip(self, password))]
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<User, LifecycleError> {
        let mut tx = self.store.begin().await?;
        let user = match tx.find_user_by_username(username.trim()).await? {
            Some(user) => user,
            None => {
                warn!("Login failed: unknown user");
                return Err(IdentityError::InvalidCredentials.into());
            }
        };

        if !self.hasher.verify(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(IdentityError::InvalidCredentials.into());
        }
        if !user.is_active {
            warn!(user_id = %user.id, "Login failed: inactive account");
            return Err(IdentityError::InactiveAccount.into());
        }

        info!(user_id = %user.id, "User authenticated");
        Ok(user)
    }

    /// Resolves a token subject to the caller as currently stored
    ///
    /// The stored role wins over whatever the token carried, and a deactivated
    /// account is rejected even while its token is unexpired.
    pub async fn resolve_actor(&self, user_id: UserId) -> Result<Actor, LifecycleError> {
        let mut tx = self.store.begin().await?;
        match tx.find_user(user_id).await? {
            Some(user) if user.is_active => Ok(user.actor()),
            Some(_) => Err(IdentityError::InactiveAccount.into()),
            None => Err(LifecycleError::unauthorized("unknown user")),
        }
    }

    /// Reads an account; callers see their own, admins see any
    pub async fn get_user(&self, actor: &Actor, user_id: UserId) -> Result<User, LifecycleError> {
        if actor.user_id != user_id {
            require(actor, Capability::ManageUsers, "view other users")?;
        }
        let mut tx = self.store.begin().await?;
        tx.find_user(user_id)
            .await?
            .ok_or_else(|| LifecycleError::user_not_found(user_id))
    }

    pub async fn list_users(&self, actor: &Actor, page: Page) -> Result<Vec<User>, LifecycleError> {
        require(actor, Capability::ManageUsers, "list users")?;
        let mut tx = self.store.begin().await?;
        Ok(tx.list_users(page).await?)
    }

    /// Deactivates an account; the record is kept
    #[instrument(skip(self, actor), fields(admin = %actor.user_id))]
    pub async fn deactivate_user(
        &self,
        actor: &Actor,
        user_id: UserId,
    ) -> Result<User, LifecycleError> {
        require(actor, Capability::ManageUsers, "deactivate users")?;

        let mut tx = self.store.begin().await?;
        let mut user = tx
            .find_user(user_id)
            .await?
            .ok_or_else(|| LifecycleError::user_not_found(user_id))?;
        user.deactivate();
        tx.update_user(&user).await?;
        tx.commit().await?;

        info!(user_id = %user.id, "User deactivated");
        Ok(user)
    }

    #[instrument(skip(self, actor), fields(admin = %actor.user_id))]
    pub async fn assign_role(
        &self,
        actor: &Actor,
        user_id: UserId,
        role: UserRole,
    ) -> Result<User, LifecycleError> {
        require(actor, Capability::ManageUsers, "assign roles")?;

        let mut tx = self.store.begin().await?;
        let mut user = tx
            .find_user(user_id)
            .await?
            .ok_or_else(|| LifecycleError::user_not_found(user_id))?;
        let previous = user.role;
        user.assign_role(role);
        tx.update_user(&user).await?;
        tx.commit().await?;

        info!(user_id = %user.id, from = %previous, to = %role, "Role assigned");
        Ok(user)
    }

    /// Creates the administrator account unless the username is already taken
    ///
    /// Returns the new account, or `None` when it already existed.
    pub async fn ensure_admin(
        &self,
        bootstrap: &AdminBootstrap,
    ) -> Result<Option<User>, LifecycleError> {
        {
            let mut tx = self.store.begin().await?;
            if tx.find_user_by_username(&bootstrap.username).await?.is_some() {
                return Ok(None);
            }
        }

        let input = NewUser {
            email: bootstrap.email.clone(),
            username: bootstrap.username.clone(),
            password: bootstrap.password.clone(),
            full_name: bootstrap.full_name.clone(),
            phone: None,
            address: None,
            role: Some(UserRole::Admin),
        };
        let system = Actor::new(UserId::new(), UserRole::Admin);
        let admin = self.register(Some(&system), input).await?;
        info!(username = %admin.username, "Default admin user created");
        Ok(Some(admin))
    }
}
