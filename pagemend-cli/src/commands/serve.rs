//! Serve command - expose the pipeline over HTTP
//!
//! Routes:
//!   POST /api/bug-fix  - run the pipeline on a JSON artifact set
//!   POST /analyze      - alias for the same handler
//!   GET  /api/health   - liveness probe
//!
//! CORS is wide open so a page under repair can call the API from any
//! origin.

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use clap::Args;
use pagemend_core::{ArtifactSet, Pipeline};
use warp::http::StatusCode;
use warp::{Filter, Reply};

use super::build_pipeline;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind (overrides config)
    #[arg(long)]
    pub host: Option<String>,
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(&self, verbose: bool, config: &pagemend_core::Config) -> anyhow::Result<()> {
        let host = self.host.as_deref().unwrap_or(&config.server.host);
        let ip: IpAddr = host
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid host address {}: {}", host, e))?;
        let addr = SocketAddr::from((ip, config.server.port));

        let pipeline = Arc::new(build_pipeline(config)?);

        if verbose {
            tracing::info!(%addr, "Starting pagemend server");
        }
        println!("Pagemend server listening on http://{}", addr);

        warp::serve(routes(pipeline)).run(addr).await;
        Ok(())
    }
}

/// All routes with CORS applied
pub(crate) fn routes(
    pipeline: Arc<Pipeline>,
) -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    let health = warp::path!("api" / "health")
        .and(warp::get())
        .map(|| warp::reply::json(&serde_json::json!({ "status": "ok" })));

    let bug_fix = warp::path!("api" / "bug-fix")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_pipeline(Arc::clone(&pipeline)))
        .and_then(handle_fix);

    let analyze = warp::path!("analyze")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_pipeline(pipeline))
        .and_then(handle_fix);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "POST", "OPTIONS"]);

    health.or(bug_fix).or(analyze).with(cors)
}

async fn handle_fix(
    input: ArtifactSet,
    pipeline: Arc<Pipeline>,
) -> Result<impl Reply, Infallible> {
    match pipeline.run(input).await {
        Ok(report) => Ok(warp::reply::with_status(
            warp::reply::json(&report),
            StatusCode::OK,
        )),
        Err(err) => {
            tracing::error!(error = %err, "pipeline run failed");
            let body = serde_json::json!({ "error": err.to_string() });
            Ok(warp::reply::with_status(
                warp::reply::json(&body),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

fn with_pipeline(
    pipeline: Arc<Pipeline>,
) -> impl Filter<Extract = (Arc<Pipeline>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&pipeline))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagemend_core::completer::{KnowledgeBase, Snippet};

    struct NoKnowledge;

    #[async_trait::async_trait]
    impl KnowledgeBase for NoKnowledge {
        async fn similarity_search(
            &self,
            _query: &str,
            _k: usize,
        ) -> pagemend_core::Result<Vec<Snippet>> {
            Ok(Vec::new())
        }

        fn name(&self) -> &'static str {
            "none"
        }
    }

    fn test_routes(
    ) -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
        routes(Arc::new(Pipeline::new(Arc::new(NoKnowledge))))
    }

    #[tokio::test]
    async fn test_health_answers_ok() {
        let res = warp::test::request()
            .method("GET")
            .path("/api/health")
            .reply(&test_routes())
            .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_bug_fix_returns_pending_report() {
        let res = warp::test::request()
            .method("POST")
            .path("/api/bug-fix")
            .json(&serde_json::json!({
                "html": "<div>Lorem ipsum dolor sit amet</div>",
                "css": "",
                "javascript": ""
            }))
            .reply(&test_routes())
            .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["status"], "pending");
        assert_eq!(body["message"], "Changes require user approval");
        assert!(!body["fixes"].as_array().unwrap().is_empty());
        // The preview body has the placeholder replaced already.
        assert!(!body["html_fixed"]
            .as_str()
            .unwrap()
            .contains("Lorem ipsum"));
    }

    #[tokio::test]
    async fn test_analyze_alias_matches_bug_fix() {
        let res = warp::test::request()
            .method("POST")
            .path("/analyze")
            .json(&serde_json::json!({ "html": "<div>Lorem ipsum dolor sit amet</div>" }))
            .reply(&test_routes())
            .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["status"], "pending");
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let res = warp::test::request()
            .method("POST")
            .path("/api/bug-fix")
            .body("not json")
            .reply(&test_routes())
            .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_any_origin() {
        let res = warp::test::request()
            .method("OPTIONS")
            .path("/api/bug-fix")
            .header("origin", "http://example.com")
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "content-type")
            .reply(&test_routes())
            .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some("http://example.com")
        );
    }
}
