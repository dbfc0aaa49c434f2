use std::sync::{Arc, Mutex};

use fsrv_log::{ConsoleSink, LogLevel, Logger, Sink};

// a sink that keeps everything it saw, so tests can look at it
struct MemorySink {
  lines: Arc<Mutex<Vec<String>>>,
}

impl Sink for MemorySink {
  fn write(&mut self, level: &LogLevel, name: &str, msg: &str) {
    if let Ok(mut lines) = self.lines.lock() {
      lines.push(format!("[{}] [{}] {}", level.label(), name, msg));
    }
  }
}

fn logger_with_memory(max_level: LogLevel) -> (Logger, Arc<Mutex<Vec<String>>>) {
  let lines = Arc::new(Mutex::new(Vec::new()));
  let logger = Logger::new("test", max_level);
  logger.add_sink(Box::new(MemorySink {
    lines: lines.clone(),
  }));
  (logger, lines)
}

#[test]
fn messages_reach_the_sink() {
  let (logger, lines) = logger_with_memory(LogLevel::Trace);
  logger.info("hi mom");
  let lines = lines.lock().unwrap();
  assert_eq!(lines.len(), 1);
  assert_eq!(lines[0], "[INFO] [test] hi mom");
}

#[test]
fn verbose_messages_are_dropped() {
  let (logger, lines) = logger_with_memory(LogLevel::Warn);
  logger.error("kept");
  logger.warn("kept too");
  logger.info("dropped");
  logger.debug("dropped");
  logger.trace("dropped");
  let lines = lines.lock().unwrap();
  assert_eq!(lines.len(), 2);
  assert_eq!(lines[0], "[ERROR] [test] kept");
  assert_eq!(lines[1], "[WARN] [test] kept too");
}

#[test]
fn named_sub_logger_shares_sinks() {
  let (logger, lines) = logger_with_memory(LogLevel::Info);
  let server_log = logger.named("server");
  server_log.info("listening");
  logger.info("still here");
  let lines = lines.lock().unwrap();
  assert_eq!(lines.len(), 2);
  assert_eq!(lines[0], "[INFO] [server] listening");
  assert_eq!(lines[1], "[INFO] [test] still here");
}

#[test]
fn level_values_round_trip() {
  for value in 0..5u8 {
    let level = LogLevel::from_value(value).unwrap();
    assert_eq!(level.value(), value);
  }
  assert_eq!(LogLevel::from_value(5), None);
  assert_eq!(LogLevel::from_value(255), None);
}

#[test]
fn console_sink_smoke() {
  let logger = Logger::new("console", LogLevel::Info);
  logger.add_sink(Box::new(ConsoleSink::new()));
  logger.info("hi mom");
  // sleep the main thread so the sink can write on its own schedule
  std::thread::sleep(std::time::Duration::from_secs(2));
}
