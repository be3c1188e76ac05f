//! robots.txt permission checks.

use anyhow::Context;
use texting_robots::Robot;
use tracing::{debug, info, warn};
use url::Url;

/// Location of the robots.txt governing `target`.
pub fn robots_url(target: &str) -> anyhow::Result<Url> {
    let mut url = Url::parse(target).with_context(|| format!("invalid URL: {target}"))?;
    if url.host_str().is_none() {
        anyhow::bail!("URL has no host: {target}");
    }
    url.set_path("/robots.txt");
    url.set_query(None);
    url.set_fragment(None);
    // Only fails for URLs without a host, excluded above.
    let _ = url.set_username("");
    let _ = url.set_password(None);
    Ok(url)
}

/// Decide whether `target` may be fetched, given the robots.txt response.
///
/// - 2xx: obey the rules (an unparseable file allows everything)
/// - 401/403: everything is disallowed
/// - other 4xx: there are no rules, everything is allowed
/// - anything else: disallowed
pub fn decide(status: u16, body: &[u8], user_agent: &str, target: &str) -> bool {
    match status {
        200..=299 => match Robot::new(user_agent, body) {
            Ok(robot) => robot.allowed(target),
            Err(e) => {
                warn!(error = %e, "Unparseable robots.txt, allowing");
                true
            }
        },
        401 | 403 => false,
        400..=499 => true,
        _ => false,
    }
}

/// Fetch robots.txt for `target` and check whether `user_agent` may crawl it.
pub async fn can_crawl(
    client: &reqwest::Client,
    target: &str,
    user_agent: &str,
) -> anyhow::Result<bool> {
    let robots = robots_url(target)?;
    debug!(robots = %robots, "Fetching robots.txt");

    let resp = client
        .get(robots.clone())
        .send()
        .await
        .with_context(|| format!("failed to fetch {robots}"))?;

    let status = resp.status();
    let body = if status.is_success() {
        resp.bytes()
            .await
            .with_context(|| format!("failed to read {robots}"))?
            .to_vec()
    } else {
        Vec::new()
    };

    let allowed = decide(status.as_u16(), &body, user_agent, target);
    info!(target, user_agent, status = status.as_u16(), allowed, "robots.txt checked");
    Ok(allowed)
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    const RULES: &str = "User-agent: *\nDisallow: /private\n\nUser-agent: badbot\nDisallow: /\n";

    #[test]
    fn test_robots_url() {
        let url = robots_url("https://user:pw@example.com:8443/a/b?q=1#frag").unwrap();
        assert_eq!(url.as_str(), "https://example.com:8443/robots.txt");

        let url = robots_url("http://example.com").unwrap();
        assert_eq!(url.as_str(), "http://example.com/robots.txt");
    }

    #[test]
    fn test_robots_url_rejects_bad_input() {
        assert!(robots_url("not a url").is_err());
        assert!(robots_url("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_decide_rules() {
        let body = RULES.as_bytes();
        assert!(decide(200, body, "*", "https://example.com/public/page"));
        assert!(!decide(200, body, "*", "https://example.com/private/page"));
        assert!(!decide(200, body, "badbot", "https://example.com/public/page"));
    }

    #[test]
    fn test_decide_status_codes() {
        assert!(!decide(401, b"", "*", "https://example.com/"));
        assert!(!decide(403, b"", "*", "https://example.com/"));
        assert!(decide(404, b"", "*", "https://example.com/"));
        assert!(!decide(500, b"", "*", "https://example.com/"));
    }

    #[test]
    fn test_decide_empty_file_allows() {
        assert!(decide(200, b"", "*", "https://example.com/anything"));
    }

    /// Serve one HTTP response on a local port and return the base URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_can_crawl_against_local_server() {
        let base = serve_once("200 OK", RULES).await;
        let client = reqwest::Client::new();
        let allowed = can_crawl(&client, &format!("{base}/private/x"), "*")
            .await
            .unwrap();
        assert!(!allowed);
    }

    #[tokio::test]
    async fn test_can_crawl_missing_robots_allows() {
        let base = serve_once("404 Not Found", "").await;
        let client = reqwest::Client::new();
        assert!(can_crawl(&client, &format!("{base}/page"), "*").await.unwrap());
    }

    #[tokio::test]
    async fn test_can_crawl_unreachable_is_error() {
        // Bind then drop to get a port nothing listens on.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = reqwest::Client::new();
        let result = can_crawl(&client, &format!("http://127.0.0.1:{port}/"), "*").await;
        assert!(result.is_err());
    }
}
