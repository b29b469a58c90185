pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod utils;

use std::sync::Arc;

use crate::services::{job_service::JobService, shift_service::ShiftService};
use crate::store::Datastore;
use crate::utils::clock::Clock;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Datastore>,
    pub job_service: JobService,
    pub shift_service: ShiftService,
}

impl AppState {
    pub fn new(store: Arc<dyn Datastore>, clock: Arc<dyn Clock>) -> Self {
        let shift_service = ShiftService::new(store.clone());
        let job_service = JobService::new(store.clone(), clock, shift_service.clone());

        Self {
            store,
            job_service,
            shift_service,
        }
    }
}
