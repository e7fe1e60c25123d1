use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use bytes::Bytes;
use fenfav_core::Error;
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::router::{FavoritesRequest, FavoritesResponse, Router};

/// Accept HTTP/1 connections on `listener` until `shutdown` resolves, then wait
/// for in-flight connections to finish.
///
/// The request path is not interpreted: every path is the favorites endpoint.
pub async fn serve(
    listener: TcpListener,
    router: Arc<Router>,
    max_body_bytes: usize,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    let graceful = GracefulShutdown::new();
    tokio::pin!(shutdown);

    info!(address = %listener.local_addr()?, "Listening for favorites requests");

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        warn!(error = %e, "Failed to accept connection");
                        continue;
                    }
                };

                let router = router.clone();
                let service = service_fn(move |request| {
                    let router = router.clone();
                    async move { Ok::<_, Infallible>(handle(request, router, max_body_bytes).await) }
                });

                let connection = http1::Builder::new().serve_connection(TokioIo::new(stream), service);
                let connection = graceful.watch(connection);
                tokio::spawn(async move {
                    if let Err(e) = connection.await {
                        debug!(%peer, error = %e, "Connection closed with error");
                    }
                });
            }
            _ = &mut shutdown => {
                info!("Shutting down, draining open connections");
                break;
            }
        }
    }

    graceful.shutdown().await;
    Ok(())
}

async fn handle(
    request: Request<Incoming>,
    router: Arc<Router>,
    max_body_bytes: usize,
) -> Response<Full<Bytes>> {
    let span = info_span!("request", method = %request.method(), path = %request.uri().path());
    async move {
        let (parts, body) = request.into_parts();
        let body = match Limited::new(body, max_body_bytes).collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                let e = Error::MalformedRequest(format!("failed to read request body: {e}"));
                warn!(error = %e, "Rejected request body");
                return FavoritesResponse::error(&e).into_http();
            }
        };

        let request = FavoritesRequest {
            method: parts.method,
            query: parts.uri.query().map(str::to_owned),
            body,
        };

        // Store operations may hit the disk.
        let response = match tokio::task::spawn_blocking(move || router.handle(&request)).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Request handler panicked");
                let e = Error::Persistence("request handler failed".to_string());
                FavoritesResponse::error(&e)
            }
        };

        info!(status = response.status.as_u16(), "Handled request");
        response.into_http()
    }
    .instrument(span)
    .await
}
