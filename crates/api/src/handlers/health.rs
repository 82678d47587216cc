/// GET /api/healthz -- liveness check.
pub async fn healthz() -> &'static str {
    "OK"
}
