use std::cmp::Ordering::*;
use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::pin::Pin;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncReadExt, BufReader, BufWriter};
use tokio::net::{TcpListener, TcpStream};

use super::encoding::chunked::ChunkedDecoder;
use super::request::Request;
use super::responders::static_message::StaticResponder;
use super::responders::Responder;
use super::response::ResponseError;

#[derive(PartialEq, Eq, Hash)]
pub struct Route {
    pub method: String,
    pub uri: String,
    pub has_params: bool,
}

impl Route {
    pub fn new(method: &str, uri: &str) -> Route {
        Route {
            method: method.to_owned(),
            uri: uri.to_owned(),
            has_params: uri.contains('<'),
        }
    }
}

pub struct RouteMap<'r> {
    pub(crate) inner: HashMap<Route, Box<dyn Responder + 'r>>,
}

impl<'r> RouteMap<'r> {
    pub fn new() -> RouteMap<'r> {
        RouteMap {
            inner: HashMap::new(),
        }
    }

    pub fn add_route<T: 'r + Responder>(&mut self, mut route: Route, responder: T) {
        // remove leading / if any
        if !route.uri.starts_with('/') {
            route.uri = "/".to_owned() + route.uri.as_str();
        }
        self.inner.insert(route, Box::new(responder));
    }
}

pub struct Server {
    pub ip: Ipv4Addr,
    pub port: u16,
    listener: TcpListener,
}

#[derive(Debug)]
pub enum ServerError {
    BindError(std::io::Error), // server failed to bind on ip and port
    ConnectionFailed(std::io::Error), // server failed to grab connection from listener
    InternalError,             // failed to process the stream
}

impl From<ResponseError> for ServerError {
    fn from(_err: ResponseError) -> ServerError {
        ServerError::InternalError
    }
}

impl Server {
    pub async fn new(ip: &Ipv4Addr, port: &u16) -> Result<Server, ServerError> {
        // attempt to bind the server to the specified ip and port.
        // port 0 asks the os for an ephemeral port, so keep the port we actually got
        match TcpListener::bind((ip.clone(), port.clone())).await {
            Ok(listener) => {
                let bound_port = match listener.local_addr() {
                    Ok(addr) => addr.port(),
                    Err(error) => return Err(ServerError::BindError(error)),
                };
                return Ok(Server {
                    ip: ip.clone(),
                    port: bound_port,
                    listener: listener,
                });
            }
            Err(error) => return Err(ServerError::BindError(error)),
        };
    }

    pub fn local_addr(&self) -> SocketAddr {
        return SocketAddr::from((self.ip, self.port));
    }

    // starts the server, blocks the task while the server is running
    pub async fn start(&self, routes: RouteMap<'static>) -> Result<(), ServerError> {
        let routes_arc = Arc::new(routes);
        loop {
            match self.listener.accept().await {
                Ok((stream, _socket)) => {
                    let process_routes = routes_arc.clone();
                    tokio::spawn(async move { process_stream(stream, process_routes).await });
                }
                Err(error) => return Err(ServerError::ConnectionFailed(error)),
            }
        }
    }
}

fn find_best_route<'m>(request: &Request, routes: &'m RouteMap) -> Option<&'m Route> {
    // ~~ find the best responder ~~
    // first check for an exact match
    if let Some(route) = routes.inner.keys().find(|route| {
        !route.has_params && request.method == route.method && route.uri == request.uri
    }) {
        return Some(route);
    }
    // non-terminal route params WILL NOT contain more than one request uri part
    // terminal route params WILL contain the remainder of the request uri
    let request_parts: Vec<&str> = request.uri.split('/').collect();
    // only keys with matching method
    match routes
        .inner
        .keys()
        .filter_map(|route| {
            if route.method != request.method {
                return None;
            }

            let route_parts: Vec<&str> = route.uri.split('/').collect();
            // compare length. route cannot match request with less parts
            if route_parts.len() > request_parts.len() {
                return None;
            }
            // find the one with the most matching parts
            let mut matched = 0;
            let mut first_param = 0;
            for i in 0..request_parts.len() {
                if request_parts[i] == route_parts[i] || route_parts[i].contains('<') {
                    matched = i + 1;
                    if first_param == 0 && route_parts[i].contains('<') {
                        first_param = i + 1;
                    }
                    if (i + 1) == route_parts.len() {
                        break;
                    }
                } else {
                    return None;
                } // uri doesn't match
            }
            return Some((route, matched, first_param));
        })
        .max_by(|x, y| match (x.1).cmp(&y.1) {
            Less => return Less,
            Greater => return Greater,
            Equal => ((x.2).cmp(&y.2)).reverse(),
        }) {
        Some((route, _, _)) => return Some(route),
        None => return None,
    }
}

fn parse_route_params(request: &Request, route: &Route) -> Vec<(String, String)> {
    // requests shouldn't have many params,
    // so a Vec should be generally much faster than a hashmap of small size
    let mut params: Vec<(String, String)> = Vec::new();

    if !route.has_params {
        return params;
    }

    let request_parts: Vec<&str> = request.uri.split('/').collect();
    let route_uri_parts: Vec<&str> = route.uri.split('/').collect();
    let part_length = route_uri_parts.len();
    for i in 0..part_length {
        if route_uri_parts[i].contains('<') {
            let name = route_uri_parts[i].to_owned();
            let value = if i == part_length - 1 {
                // if the last part of the route is a route param...
                // then combine the remaining parts from the request uri (ex. a path to a subfolder)
                request_parts[i..].join("/")
            } else {
                request_parts[i].to_owned()
            };
            params.push((name, value));
        }
    }
    return params;
}

// process a client request
async fn process_stream(
    mut stream: TcpStream,
    routes: Arc<RouteMap<'_>>,
) -> Result<(), ServerError> {
    // split the stream into reader and writer
    let (reader, writer) = stream.split();
    let mut buf_reader = BufReader::new(reader);
    let mut buf_writer = BufWriter::new(writer);

    let mut keep_alive = true;
    while keep_alive {
        let mut response = match Request::new(&mut buf_reader).await {
            Ok(mut request) => {
                // anything older than 1.1 doesn't get keep-alive
                keep_alive = request.version.trim() == "HTTP/1.1";
                match find_best_route(&request, &routes) {
                    Some(route) => {
                        // safe to unwrap here because we know the route exists
                        let responder = routes.inner.get(route).unwrap();
                        let params = parse_route_params(&request, route);
                        match request.parse_headers(&mut buf_reader).await {
                            Ok(()) => {
                                // use a trait object because the final reader type is unknown at compile time
                                let mut body_reader: Pin<
                                    Box<dyn AsyncBufRead + Send + Sync + '_>,
                                > = Box::pin(&mut buf_reader);

                                // anything we can't frame gets rejected before dispatch
                                let mut reject: Option<u16> = None;

                                if let Some(req_headers) = &request.headers {
                                    // using transfer encodings on the body?
                                    if let Some(value) = req_headers.get("transfer-encoding") {
                                        let encodings: Vec<String> = value
                                            .split(',')
                                            .map(|e| e.trim().to_lowercase())
                                            .collect();
                                        if let Some(last) = encodings.last() {
                                            if last != "chunked" {
                                                // without a final chunked encoding the body
                                                // only ends when the connection does
                                                keep_alive = false;
                                            }
                                        }
                                        // apply decoders in order
                                        for encoding in encodings {
                                            body_reader = match encoding.as_str() {
                                                // TODO: Add gzip/deflate encoders/decoders
                                                "chunked" => Box::pin(BufReader::new(
                                                    ChunkedDecoder::new(body_reader),
                                                )),
                                                "identity" => body_reader,
                                                _ => {
                                                    reject = Some(501);
                                                    break;
                                                }
                                            }
                                        }
                                    }

                                    if reject.is_none() {
                                        if let Some(value) = req_headers.get("content-length") {
                                            match value.parse::<u64>() {
                                                Ok(content_length) => {
                                                    body_reader =
                                                        Box::pin(body_reader.take(content_length));
                                                    keep_alive = true;
                                                }
                                                Err(_error) => reject = Some(400),
                                            }
                                        }
                                    }

                                    // does the request want to close the connection?
                                    // this wins over everything decided above
                                    if let Some(con_header) = req_headers.get("connection") {
                                        if con_header.eq_ignore_ascii_case("close") {
                                            keep_alive = false;
                                        }
                                    }
                                }

                                match reject {
                                    None => {
                                        request.set_message_body(Some(body_reader));

                                        // validate the request is able to be responded to with the selected responder
                                        match responder.validate(&request, &params) {
                                            Ok(validation) => {
                                                match responder
                                                    .build_response(&mut request, &params, validation)
                                                    .await
                                                {
                                                    Ok(new_response) => new_response,
                                                    Err(status) => {
                                                        keep_alive = false;
                                                        StaticResponder::from_status(status)
                                                            .quick_response()
                                                    }
                                                }
                                            }
                                            Err(status) => {
                                                keep_alive = false;
                                                StaticResponder::from_status(status).quick_response()
                                            }
                                        }
                                    }
                                    Some(code) => {
                                        keep_alive = false;
                                        StaticResponder::from_code(code).quick_response()
                                    }
                                }
                            }
                            Err(_error) => {
                                keep_alive = false;
                                StaticResponder::from_code(400).quick_response()
                            }
                        }
                    }
                    None => {
                        keep_alive = false;
                        StaticResponder::from_code(404).quick_response()
                    }
                }
            }
            Err(_error) => {
                keep_alive = false;
                StaticResponder::from_code(400).quick_response() // 400 Bad Request
            }
        };

        response.keep_alive = keep_alive;
        response.respond(&mut buf_writer).await?;
    }

    return Ok(());
}
