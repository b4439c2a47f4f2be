/// Liveness probe. Sits outside the session chain, so it never sets a cookie.
pub async fn ping() -> &'static str {
    "OK"
}
