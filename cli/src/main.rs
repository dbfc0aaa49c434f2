extern crate dotenv;

use std::net::Ipv4Addr;

use fsrv_args::args::{ArgSpec, Args, DEFAULT_SPEC};
use fsrv_log::{ConsoleSink, LogLevel, Logger};
use fsrv_web::responders::file::FileResponder;
use fsrv_web::responders::listing::ListingResponder;
use fsrv_web::server::{Route, RouteMap, Server};

const PROGRAM_NAME: &str = "fileserver";
const CONFIG_FILE: &str = "fileserver.env";

const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;
const DEFAULT_PORT: u16 = 8080;

fn build_args() -> Args {
  let mut args = Args::new();
  args.add(
    "root",
    ArgSpec {
      short: Some("r".to_owned()),
      description: Some("Directory to serve (default: current directory)".to_owned()),
      ..DEFAULT_SPEC
    },
  );
  args.add(
    "port",
    ArgSpec {
      short: Some("p".to_owned()),
      description: Some("Port to listen on (default: 8080)".to_owned()),
      validation: Some(Box::new(|input| input.parse::<u16>().is_ok())),
      ..DEFAULT_SPEC
    },
  );
  args.add(
    "bind",
    ArgSpec {
      short: Some("b".to_owned()),
      description: Some("IPv4 address to bind (default: 127.0.0.1)".to_owned()),
      validation: Some(Box::new(|input| input.parse::<Ipv4Addr>().is_ok())),
      ..DEFAULT_SPEC
    },
  );
  args.add(
    "log-level",
    ArgSpec {
      short: Some("l".to_owned()),
      // not validated here on purpose: a bad level falls back to the default below
      description: Some("Log level 0-4, error through trace (default: 2)".to_owned()),
      ..DEFAULT_SPEC
    },
  );
  args.add(
    "no-index",
    ArgSpec {
      description: Some("Don't serve index.html for directories or expose listings".to_owned()),
      is_flag: true,
      ..DEFAULT_SPEC
    },
  );
  args.add(
    "help",
    ArgSpec {
      short: Some("h".to_owned()),
      description: Some("Print this help text".to_owned()),
      is_flag: true,
      ..DEFAULT_SPEC
    },
  );
  return args;
}

// the command line wins over the config file
fn setting(args: &Args, name: &str, env_key: &str) -> Option<String> {
  match args.get(name) {
    Ok(Some(value)) => Some(value),
    _ => std::env::var(env_key).ok(),
  }
}

#[tokio::main]
async fn main() {
  // the config file sits next to the working directory and is optional
  let config_loaded = dotenv::from_filename(CONFIG_FILE).is_ok();

  let args = build_args();
  if args.is_set("help") {
    println!("{}", args.usage(PROGRAM_NAME));
    return;
  }
  if let Err(message) = args.check() {
    eprintln!("{}", message);
    eprintln!("{}", args.usage(PROGRAM_NAME));
    std::process::exit(2);
  }

  // the logger comes up with the default level so the level update itself gets logged
  let mut logger = Logger::new(PROGRAM_NAME, DEFAULT_LOG_LEVEL);
  logger.add_sink(Box::new(ConsoleSink::new()));
  if config_loaded {
    logger.debug(&format!("Loaded config from {}", CONFIG_FILE));
  }

  logger.info("Updating log level...");
  if let Some(value) = setting(&args, "log-level", "FILESERVER_LOG_LEVEL") {
    match value.parse::<u8>().ok().and_then(LogLevel::from_value) {
      Some(level) => logger.set_level(level),
      None => logger.warn(&format!(
        "Can't update log level: '{}' is not a level between 0 and 4. Keeping default level ({}).",
        value,
        DEFAULT_LOG_LEVEL.value()
      )),
    }
  }
  logger.debug("Done.");

  let ip = match setting(&args, "bind", "FILESERVER_BIND_IP") {
    Some(value) => value
      .parse::<Ipv4Addr>()
      .expect("Failed to parse bind address as Ipv4Addr"),
    None => Ipv4Addr::new(127, 0, 0, 1),
  };
  let port = match setting(&args, "port", "FILESERVER_BIND_PORT") {
    Some(value) => value.parse::<u16>().expect("Failed to parse port as u16"),
    None => DEFAULT_PORT,
  };
  let root = match setting(&args, "root", "FILESERVER_ROOT") {
    Some(value) => value,
    None => ".".to_owned(),
  };
  let serve_index = !args.is_set("no-index")
    && std::env::var("FILESERVER_SERVE_INDEX")
      .map(|value| value != "false")
      .unwrap_or(true);

  // routes: everything under / is the mounted directory,
  // listings live under their own prefix so they can't shadow files
  let mut routes = RouteMap::new();
  let file_responder = FileResponder::new(root.clone(), "<path>".to_owned(), serve_index)
    .expect("Failed to mount root directory");
  routes.add_route(Route::new("GET", "/<path>"), file_responder);
  if serve_index {
    let listing_responder = ListingResponder::new(root.clone(), "<path>".to_owned())
      .expect("Failed to mount root directory for listings");
    routes.add_route(Route::new("GET", "/.listing/<path>"), listing_responder);
  }

  let server = Server::new(&ip, &port)
    .await
    .expect("Failed to bind web server");
  logger.info(&format!("Serving {} on http://{}", root, server.local_addr()));

  let server_log = logger.named("server");
  if let Err(error) = server.start(routes).await {
    server_log.error(&format!("Server stopped: {:?}", error));
    std::process::exit(1);
  }
}
