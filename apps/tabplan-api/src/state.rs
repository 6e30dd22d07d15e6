use std::sync::Arc;

use tabplan_service::TabPlanService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<TabPlanService>,
}
impl AppState {
	pub fn new(config: tabplan_config::Config) -> Self {
		Self::from_service(TabPlanService::new(config))
	}

	pub fn from_service(service: TabPlanService) -> Self {
		Self { service: Arc::new(service) }
	}
}
