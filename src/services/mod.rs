//! Business logic services

pub mod catalog;
pub mod email;
pub mod reviews;
pub mod users;

use crate::{
    config::{AuthConfig, EmailConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub catalog: catalog::CatalogService,
    pub reviews: reviews::ReviewsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig, email_config: EmailConfig) -> Self {
        let email = email::EmailService::new(email_config);
        Self {
            users: users::UsersService::new(repository.clone(), auth_config, email),
            catalog: catalog::CatalogService::new(repository.clone()),
            reviews: reviews::ReviewsService::new(repository),
        }
    }
}
