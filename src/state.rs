use crate::config::settings::AppConfig;
use crate::infrastructure::db::pool::DbPool;
use crate::infrastructure::mail::service::MailService;
use crate::infrastructure::queue::DelayedQueue;
use crate::infrastructure::redis::client::RedisService;
use crate::infrastructure::storage::s3::StorageService;
use crate::modules::movies::scheduler::ReleaseScheduler;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DbPool,
    pub redis: RedisService,
    pub storage: StorageService,
    pub queue: Arc<dyn DelayedQueue>,
    pub mailer: MailService,
    pub scheduler: ReleaseScheduler,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        db: DbPool,
        redis: RedisService,
        storage: StorageService,
        queue: Arc<dyn DelayedQueue>,
        mailer: MailService,
    ) -> Self {
        let scheduler = ReleaseScheduler::new(queue.clone());
        Self {
            config,
            db,
            redis,
            storage,
            queue,
            mailer,
            scheduler,
        }
    }
}
