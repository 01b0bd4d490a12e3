use crate::job_scheduler::SchedulerHealth;
use actix_web::{web, HttpResponse};
use memora_api_structs::get_service_health::*;

async fn status(health: web::Data<SchedulerHealth>) -> HttpResponse {
    HttpResponse::Ok().json(APIResponse {
        message: "Yo! We are up!\r\n".into(),
        consecutive_scheduler_errors: health.consecutive_errors(),
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(status));
}
