//! Hotel booking Web API server.

use std::{io, time};

use application::{api, config, Args, Config};
use axum::{extract::MatchedPath, Extension, Router};
use axum_client_ip::InsecureClientIp;
use http::{header, Method};
use service::{
    infra::{notification, postgres, Postgres},
    Service,
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    fmt::MakeWriter,
    layer::{Layer as _, SubscriberExt as _},
    registry::LookupSpan,
    util::SubscriberInitExt as _,
};

postgres::embed_migrations!("../migrations");

#[tokio::main]
async fn main() {
    _ = run().await;
}

/// Loads the [`Config`], prepares the database and serves the API until a
/// shutdown signal.
async fn run() -> Result<(), ()> {
    let Args { config } = Args::parse().unwrap_or_else(|e| e.exit());
    let conf = Config::new(&config).map_err(|e| {
        // Logging is configured by the `Config` itself.
        eprintln!("failed to load `Config` from `{config}`: {e}");
    })?;
    init_logging(conf.log);

    let mut db = Postgres::new(&conf.postgres.into()).map_err(|e| {
        log::error!("failed to initialize `Postgres` client: {e}");
    })?;
    let report =
        migrations::runner().run_async(&mut db).await.map_err(|e| {
            log::error!("failed to run database migrations: {e}");
        })?;
    for m in report.applied_migrations() {
        log::info!("applied migration `{m}`");
    }

    let service = Service::new(conf.service.into(), db, notification::Log);
    let app = api::router()
        .layer(Extension(service))
        .layer(cors(&conf.server.cors_origins)?);
    let app = with_tracing(app);

    let addr = (conf.server.host.as_str(), conf.server.port);
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        log::error!("failed to listen on `{}:{}`: {e}", addr.0, addr.1);
    })?;
    log::info!("listening on `{}:{}`", addr.0, addr.1);

    let timeout = conf.server.shutdown_timeout;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(timeout))
        .await
        .map_err(|e| log::error!("webserver failed: {e}"))
}

/// Sets up the global logger writing warnings and errors to `stderr`, and
/// everything else to `stdout`.
fn init_logging(conf: config::Log) {
    tracing_subscriber::registry()
        .with(fmt_layer(conf, io::stdout, false))
        .with(fmt_layer(conf, io::stderr, true))
        .init();
}

/// Builds a compact formatting [`Layer`] writing either alarms (warnings and
/// errors) or regular events to the provided `writer`.
///
/// [`Layer`]: tracing_subscriber::Layer
fn fmt_layer<S, W>(
    conf: config::Log,
    writer: W,
    alarms: bool,
) -> impl tracing_subscriber::Layer<S>
where
    S: log::Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let max = log::Level::from(conf.level);
    tracing_subscriber::fmt::layer()
        .compact()
        .with_ansi(conf.ansi)
        .with_thread_names(true)
        .with_writer(writer)
        .with_filter(filter_fn(move |meta| {
            let level = *meta.level();
            let is_alarm = level <= log::Level::WARN;
            meta.is_span() || (is_alarm == alarms && level <= max)
        }))
}

/// Builds a [`CorsLayer`] allowing the provided `origins`.
fn cors(origins: &[String]) -> Result<CorsLayer, ()> {
    let mut layer = CorsLayer::new()
        .allow_methods([
            Method::DELETE,
            Method::GET,
            Method::OPTIONS,
            Method::POST,
            Method::PUT,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);
    for origin in origins {
        let value = origin.parse::<header::HeaderValue>().map_err(|e| {
            log::error!("`{origin}` is not a valid CORS origin: {e}");
        })?;
        layer = layer.allow_origin(value);
    }
    Ok(layer)
}

/// Wraps every request into an `HTTP request` span, and logs its outcome.
fn with_tracing(app: Router) -> Router {
    let layer = TraceLayer::new_for_http()
        .make_span_with(|r: &http::Request<_>| {
            let client_ip = InsecureClientIp::from(r.headers(), r.extensions())
                .map(|ip| ip.0.to_string())
                .ok();
            log::info_span!(
                "HTTP request",
                http.client_ip = client_ip,
                http.method = r.method().as_str(),
                http.route = r
                    .extensions()
                    .get::<MatchedPath>()
                    .map(MatchedPath::as_str),
                http.target = r
                    .uri()
                    .path_and_query()
                    .map(http::uri::PathAndQuery::as_str),
                http.user_agent = r
                    .headers()
                    .get(header::USER_AGENT)
                    .and_then(|h| h.to_str().ok()),
                http.status_code = log::field::Empty,
            )
        })
        .on_response(
            |r: &http::Response<_>, took: time::Duration, span: &log::Span| {
                let status = r.status();
                span.record("http.status_code", status.as_u16());
                let took = format!("{}ms", took.as_millis());
                if status.is_server_error() {
                    log::error!(duration = took);
                } else if status.is_client_error() {
                    log::warn!(duration = took);
                } else {
                    log::info!(duration = took);
                }
            },
        );
    app.layer(layer)
}

/// Resolves on `Ctrl+C` (or `SIGTERM` on Unix), then gives in-flight
/// requests the provided `timeout` to finish.
async fn shutdown_signal(timeout: time::Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("failed to listen for `Ctrl+C`: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                _ = s.recv().await;
            }
            Err(e) => {
                log::error!("failed to listen for `SIGTERM`: {e}");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    log::info!("shutting down, waiting up to {timeout:?} for requests");

    // Forces the exit if draining takes too long.
    tokio::spawn(async move {
        tokio::time::sleep(timeout).await;
        log::warn!("requests did not finish in {timeout:?}, exiting");
        std::process::exit(1);
    });
}
