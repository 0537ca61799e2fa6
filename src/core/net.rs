// src/core/net.rs
//
// HTTP/1.0 GET over plain TCP (std-only transport, no TLS).
// HTTP/1.0 + `Connection: close` means the server ends the body with EOF,
// so there is no chunked transfer to undo.

use std::{io::{Read, Write}, net::TcpStream, time::Duration};

use url::Url;

use crate::error::SourceError;

/// GET `url` and return the body, decoded lossily as UTF-8.
/// Only `http://` is supported; any status other than 200 is an error.
pub fn http_get(url: &str, user_agent: &str, timeout: Duration) -> Result<String, SourceError> {
    let parsed = Url::parse(url)?;
    if parsed.scheme() != "http" {
        return Err(SourceError::UnsupportedScheme(parsed.scheme().to_string()));
    }
    let host = parsed.host_str().ok_or_else(|| SourceError::MalformedUrl(url.to_string()))?;
    let port = parsed.port_or_known_default().unwrap_or(80);

    let mut path = s!(parsed.path());
    if let Some(q) = parsed.query() {
        path.push('?');
        path.push_str(q);
    }

    logd!("GET http://{host}:{port}{path}");
    let mut stream = TcpStream::connect((host, port))?;
    stream.set_read_timeout(Some(timeout))?;
    stream.set_write_timeout(Some(timeout))?;

    let req = request_line(host, &path, user_agent);
    stream.write_all(req.as_bytes())?;
    stream.flush()?;

    let mut buf = Vec::new();
    stream.read_to_end(&mut buf)?;
    let body = split_response(&String::from_utf8_lossy(&buf))?;
    logd!("received {} bytes from {host}", body.len());
    Ok(body)
}

fn request_line(host: &str, path: &str, user_agent: &str) -> String {
    format!(
        "GET {path} HTTP/1.0\r\nHost: {host}\r\nUser-Agent: {user_agent}\r\nAccept: text/html\r\nConnection: close\r\n\r\n"
    )
}

/// Check the status line and cut the headers off.
fn split_response(resp: &str) -> Result<String, SourceError> {
    let status = resp.split("\r\n").next().unwrap_or("");
    let code = status
        .split_whitespace()
        .nth(1)
        .and_then(|c| c.parse::<u16>().ok())
        .ok_or(SourceError::MalformedResponse)?;
    if code != 200 {
        return Err(SourceError::Http { status: status.to_string() });
    }
    let body_idx = resp.find("\r\n\r\n").ok_or(SourceError::MalformedResponse)? + 4;
    Ok(resp[body_idx..].to_string())
}
