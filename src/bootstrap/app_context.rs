use std::sync::Arc;

use crate::application::ports::activation_notifier::ActivationNotifier;
use crate::application::ports::image_storage::ImageStorage;
use crate::application::ports::listing_repository::ListingRepository;
use crate::application::ports::page_store::PageStore;
use crate::application::ports::rubric_repository::RubricRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::signing::ActivationSigner;
use crate::bootstrap::config::Config;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

#[derive(Clone)]
pub struct AppServices {
    user_repo: Arc<dyn UserRepository>,
    rubric_repo: Arc<dyn RubricRepository>,
    listing_repo: Arc<dyn ListingRepository>,
    image_storage: Arc<dyn ImageStorage>,
    activation_notifier: Arc<dyn ActivationNotifier>,
    page_store: Arc<dyn PageStore>,
}

impl AppServices {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        rubric_repo: Arc<dyn RubricRepository>,
        listing_repo: Arc<dyn ListingRepository>,
        image_storage: Arc<dyn ImageStorage>,
        activation_notifier: Arc<dyn ActivationNotifier>,
        page_store: Arc<dyn PageStore>,
    ) -> Self {
        Self {
            user_repo,
            rubric_repo,
            listing_repo,
            image_storage,
            activation_notifier,
            page_store,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn user_repo(&self) -> Arc<dyn UserRepository> {
        self.services.user_repo.clone()
    }

    pub fn rubric_repo(&self) -> Arc<dyn RubricRepository> {
        self.services.rubric_repo.clone()
    }

    pub fn listing_repo(&self) -> Arc<dyn ListingRepository> {
        self.services.listing_repo.clone()
    }

    pub fn image_storage(&self) -> Arc<dyn ImageStorage> {
        self.services.image_storage.clone()
    }

    pub fn activation_notifier(&self) -> Arc<dyn ActivationNotifier> {
        self.services.activation_notifier.clone()
    }

    pub fn page_store(&self) -> Arc<dyn PageStore> {
        self.services.page_store.clone()
    }

    pub fn activation_signer(&self) -> ActivationSigner {
        ActivationSigner::new(
            self.cfg.jwt_secret_pem.clone(),
            self.cfg.activation_expires_secs,
        )
    }
}
