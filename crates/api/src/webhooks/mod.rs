mod cleanup;
mod reminder_alert;

use actix_web::web;
use cleanup::cleanup_controller;
use reminder_alert::reminder_alert_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/reminder-alert", web::post().to(reminder_alert_controller));
    cfg.route("/cleanup", web::post().to(cleanup_controller));
}
