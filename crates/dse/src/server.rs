use std::{
    io::{Cursor, Read},
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
    thread,
};

use anyhow::{Context, Result};
use dsengine::{
    Registry,
    api::{self, Method},
    error::Error,
};
use parking_lot::Mutex;
use tiny_http::{Header, Request, Response, Server, StatusCode};
use tracing::{info, warn};

/// Bind address used when `--host` is not given.
pub const DEFAULT_HOST: Ipv4Addr = Ipv4Addr::new(127, 0, 0, 1);
/// Port used when neither `--port` nor `PORT` is given.
pub const DEFAULT_PORT: u16 = 3001;

/// Listener settings.
#[derive(Debug, Clone, Copy)]
pub struct ServeOptions {
    /// Address to bind.
    pub host: IpAddr,
    /// Port to bind.
    pub port: u16,
    /// Threads pulling requests off the listener.
    pub workers: usize,
}

/// Serve the router on `host:port` until the process is stopped.
pub fn serve(opts: ServeOptions) -> Result<()> {
    let addr = SocketAddr::new(opts.host, opts.port);
    let server = Arc::new(
        Server::http(addr).map_err(|err| anyhow::anyhow!("failed to bind to {addr}: {err}"))?,
    );
    let registry = Arc::new(Mutex::new(Registry::new()));

    info!(%addr, workers = opts.workers, "listening");
    println!("Server running on http://{addr} (Ctrl+C to stop)");

    let mut handles = Vec::with_capacity(opts.workers);
    for i in 0..opts.workers.max(1) {
        let server = Arc::clone(&server);
        let registry = Arc::clone(&registry);
        let handle = thread::Builder::new()
            .name(format!("dse-worker-{i}"))
            .spawn(move || worker(&server, &registry))
            .context("failed to spawn worker thread")?;
        handles.push(handle);
    }
    for handle in handles {
        handle
            .join()
            .map_err(|_| anyhow::anyhow!("worker thread panicked"))??;
    }
    Ok(())
}

/// Pull requests until the listener shuts down.
fn worker(server: &Server, registry: &Mutex<Registry>) -> Result<()> {
    loop {
        let request = server.recv().context("failed to accept request")?;
        if let Err(err) = handle_request(registry, request) {
            warn!("{err:#}");
        }
    }
}

/// Route one HTTP request and send the JSON reply.
fn handle_request(registry: &Mutex<Registry>, mut request: Request) -> Result<()> {
    let url = request.url().to_string();
    let mut raw = String::new();
    request
        .as_reader()
        .read_to_string(&mut raw)
        .with_context(|| format!("failed to read body of {url}"))?;

    let response = match request.method().as_str().parse::<Method>() {
        Ok(method) => match api::parse_body(&raw) {
            Ok(body) => api::handle(&mut registry.lock(), method, &url, &body),
            Err(err) => api::Response::from(err),
        },
        Err(_) => api::Response::from(Error::MethodNotAllowed {
            method: request.method().to_string(),
            path: url,
        }),
    };
    request
        .respond(json_response(&response)?)
        .context("failed to send response")
}

/// Encode a router response for the wire.
fn json_response(response: &api::Response) -> Result<Response<Cursor<Vec<u8>>>> {
    let content_type = Header::from_bytes("Content-Type", "application/json")
        .map_err(|()| anyhow::anyhow!("invalid content type"))?;
    let allow_origin = Header::from_bytes("Access-Control-Allow-Origin", "*")
        .map_err(|()| anyhow::anyhow!("invalid CORS header"))?;
    Ok(Response::from_string(response.body.to_string())
        .with_status_code(StatusCode(response.status))
        .with_header(content_type)
        .with_header(allow_origin))
}

#[cfg(test)]
mod tests {
    use std::{
        io::Write,
        net::{Shutdown, TcpStream},
    };

    use super::*;

    /// Send one raw HTTP request to a fresh single-request server.
    fn round_trip(registry: &Arc<Mutex<Registry>>, raw: &str) -> String {
        let server = Server::http("127.0.0.1:0").expect("bind");
        let addr = server.server_addr().to_ip().expect("tcp listener");
        let registry = Arc::clone(registry);
        let worker = thread::spawn(move || {
            let request = server.recv().expect("request");
            handle_request(&registry, request).expect("handled");
        });

        let mut stream = TcpStream::connect(addr).expect("connect");
        stream.write_all(raw.as_bytes()).expect("send");
        let mut reply = String::new();
        stream.read_to_string(&mut reply).expect("read");
        stream.shutdown(Shutdown::Both).ok();
        worker.join().expect("worker");
        reply
    }

    fn post(path: &str, body: &str) -> String {
        format!(
            "POST {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\
             Content-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
            body.len()
        )
    }

    #[test]
    fn serves_json() {
        let registry = Arc::new(Mutex::new(Registry::new()));
        let reply = round_trip(&registry, &post("/api/stack/create/s", ""));
        assert!(reply.starts_with("HTTP/1.1 200"), "{reply}");
        assert!(reply.contains("application/json"));
        assert!(reply.contains("Stack created"));

        let reply = round_trip(&registry, &post("/api/stack/s/push", r#"{"value": 7}"#));
        assert!(reply.contains(r#""stack":[7]"#), "{reply}");
        assert_eq!(registry.lock().len(), 1);
    }

    #[test]
    fn rejects_bad_requests() {
        let registry = Arc::new(Mutex::new(Registry::new()));
        let reply = round_trip(&registry, &post("/api/stack/create/s", "{oops"));
        assert!(reply.starts_with("HTTP/1.1 400"), "{reply}");
        assert!(reply.contains("malformed JSON body"));

        let put = "PUT /api/health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n";
        let reply = round_trip(&registry, put);
        assert!(reply.starts_with("HTTP/1.1 405"), "{reply}");

        let reply = round_trip(&registry, &post("/api/nothing", ""));
        assert!(reply.starts_with("HTTP/1.1 404"), "{reply}");
    }
}
