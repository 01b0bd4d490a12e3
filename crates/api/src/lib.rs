mod alerting;
mod error;
mod job_scheduler;
mod reminder;
mod shared;
mod status;
mod webhooks;

pub use job_scheduler::SchedulerHealth;

use actix_cors::Cors;
use actix_web::{dev::Server, middleware, web, App, HttpServer};
use job_scheduler::JobScheduler;
use memora_infra::Context;
use std::net::TcpListener;
use tracing::info;
use tracing_actix_web::TracingLogger;

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    reminder::configure_routes(cfg);
    status::configure_routes(cfg);
}

pub struct Application {
    server: Server,
    port: u16,
    scheduler: Option<JobScheduler>,
}

impl Application {
    pub async fn new(context: Context) -> Result<Self, std::io::Error> {
        let health = SchedulerHealth::default();
        let (server, port) =
            Application::configure_server(context.clone(), health.clone()).await?;
        let scheduler = Application::start_job_scheduler(context, health);

        Ok(Self {
            server,
            port,
            scheduler,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    fn start_job_scheduler(context: Context, health: SchedulerHealth) -> Option<JobScheduler> {
        if !context.config.use_polling {
            info!("USE_POLLING is disabled. Reminder alerts are driven by webhook callbacks.");
            return None;
        }
        Some(JobScheduler::start(context, health))
    }

    async fn configure_server(
        context: Context,
        health: SchedulerHealth,
    ) -> Result<(Server, u16), std::io::Error> {
        let port = context.config.port;
        let address = format!("0.0.0.0:{}", port);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();

        let server = HttpServer::new(move || {
            let ctx = context.clone();

            App::new()
                .wrap(Cors::permissive())
                .wrap(middleware::Compress::default())
                .wrap(TracingLogger::default())
                .app_data(web::Data::new(ctx))
                .app_data(web::Data::new(health.clone()))
                .service(web::scope("/api/v1").configure(configure_server_api))
                .service(web::scope("/webhooks").configure(webhooks::configure_routes))
        })
        .listen(listener)?
        .workers(4)
        .run();

        Ok((server, port))
    }

    pub async fn start(self) -> Result<(), std::io::Error> {
        let res = self.server.await;
        if let Some(scheduler) = self.scheduler {
            scheduler.stop();
        }
        res
    }
}
