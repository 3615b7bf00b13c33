use std::net::TcpListener;

use wiremock::MockServer;

/// Set to `1` to fail instead of skipping when localhost is unavailable.
const REQUIRE_ENV: &str = "BIBTEX_DBLP_REQUIRE_SOCKET_TESTS";

/// Starts a mock dblp server, or returns `None` when this environment cannot
/// bind a localhost port (the calling test then returns early).
#[track_caller]
pub fn start_mock_server_or_skip() -> impl Future<Output = Option<MockServer>> {
    let caller = std::panic::Location::caller();
    let can_bind = TcpListener::bind("127.0.0.1:0").is_ok();
    let required = std::env::var(REQUIRE_ENV).is_ok_and(|value| value == "1");
    async move {
        if can_bind {
            return Some(MockServer::start().await);
        }
        assert!(!required, "{caller}: cannot bind localhost while {REQUIRE_ENV}=1");
        eprintln!("{caller}: cannot bind localhost, skipping mock server test");
        None
    }
}
